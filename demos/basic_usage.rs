// ============================================================================
// Basic Usage Example
// ============================================================================

use double_auction::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Double Auction Example ===\n");

    // Clearing house: orders accumulate, one uniform price per round
    let (observer, events) = ChannelObserver::bounded(256);
    let mut auction = AuctioneerBuilder::clearing_house("WIDGETS", Decimal::new(5, 1))
        .quote_beating()
        .settlement_handler(Box::new(|s: &Settlement| {
            println!(
                "  Settled: {} buys {} from {} @ {} (qty: {})",
                s.buyer, s.bid, s.seller, s.price, s.quantity
            );
        }))
        .observer(Arc::new(observer))
        .build()
        .expect("valid configuration");

    println!("Created clearing house for {}\n", auction.market());

    auction.open_day().expect("session open");
    auction.open_round().expect("session open");

    // Buyers value widgets between 60 and 100; each bid improves the quote
    println!("Adding bids...");
    for i in 0u64..5 {
        let bid = Order::bid(Decimal::from(60 + i * 10), 1, TraderId::new(i));
        match auction.submit(bid) {
            Ok(id) => println!("  Bid {} accepted", id),
            Err(err) => println!("  Bid rejected: {}", err),
        }
    }

    // Sellers' costs range from 95 down to 55
    println!("Adding asks...");
    for i in 0u64..5 {
        let ask = Order::ask(Decimal::from(95 - i * 10), 1, TraderId::new(10 + i));
        match auction.submit(ask) {
            Ok(id) => println!("  Ask {} accepted", id),
            Err(err) => println!("  Ask rejected: {}", err),
        }
    }

    println!("\n=== Order Book ===");
    println!("Quote: {}", auction.quote());
    println!("Matched volume: {}", auction.book().matched_volume());

    println!("\nBids:");
    for (price, qty) in auction.book().depth(Side::Bid, 5) {
        println!("  {} @ {}", qty, price);
    }

    println!("\nAsks:");
    for (price, qty) in auction.book().depth(Side::Ask, 5) {
        println!("  {} @ {}", qty, price);
    }

    // A bid below the bid quote does not improve the market
    println!("\n=== Quote-Beating Rule ===");
    if let Err(err) = auction.submit(Order::bid(Decimal::from(50), 1, TraderId::new(99))) {
        println!("  {}", err);
    }

    println!("\n=== Clearing ===");
    let settlements = auction.clear().expect("clearing succeeds");
    println!("{} settlements", settlements.len());

    println!("\n=== Session Close ===");
    let leftovers = auction.close_session();
    println!("{} orders still resting at close", leftovers.len());

    let kinds: Vec<&str> = events.try_iter().map(|e| e.kind()).collect();
    println!("Events observed: {:?}", kinds);
}
