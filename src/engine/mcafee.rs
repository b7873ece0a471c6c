// ============================================================================
// McAfee Clearing Mechanism
// Dominant-strategy double auction (McAfee 1992)
// ============================================================================

use crate::domain::{MarketQuote, Order, OrderBook, Pairing, Settlement};
use crate::engine::clearing::execute_all;
use crate::errors::ClearError;
use crate::interfaces::{ClearingPolicy, PricingPolicy};
use crate::numeric::{midpoint, Quantity};
use rust_decimal::Decimal;

/// McAfee's mechanism over units of matched volume.
///
/// With `k` matched units, `b_k` the lowest matched bid, `s_k` the highest
/// matched ask, `b_{k+1}` the highest unmatched bid and `s_{k+1}` the lowest
/// unmatched ask:
///
/// - if `p0 = (b_{k+1} + s_{k+1}) / 2` exists and lies in `[s_k, b_k]`, all
///   `k` units trade at `p0`;
/// - otherwise the marginal unit is excluded and the other `k - 1` units
///   trade best first, buyers paying `b_k` and sellers receiving `s_k`.
///   The auctioneer keeps `b_k - s_k` per unit.
///
/// Prices are formed here; the pricing policy is never consulted.
///
/// # Example
/// ```text
/// Matched: bid 60 / ask 40    Unmatched: bid 45, ask 55
/// p0 = 50 in [40, 60]  =>  1 @ 50
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct McAfeeClearing;

impl McAfeeClearing {
    pub fn new() -> Self {
        Self
    }

    /// Candidate single price, when both unmatched boundary orders exist
    fn candidate_price(book: &OrderBook) -> Option<Decimal> {
        let bid = book.highest_unmatched_bid()?.price();
        let ask = book.lowest_unmatched_ask()?.price();
        Some(midpoint(bid, ask))
    }
}

impl ClearingPolicy for McAfeeClearing {
    fn clear(
        &self,
        book: &mut OrderBook,
        _pricing: &dyn PricingPolicy,
        _quote: &MarketQuote,
    ) -> Result<Vec<Settlement>, ClearError> {
        let (Some(lowest_bid), Some(highest_ask)) = (
            book.lowest_matched_bid().map(Order::price),
            book.highest_matched_ask().map(Order::price),
        ) else {
            return Ok(Vec::new());
        };

        let single_price = Self::candidate_price(book)
            .filter(|p0| highest_ask <= *p0 && *p0 <= lowest_bid);

        let settlements: Vec<Settlement> = match single_price {
            Some(p0) => {
                tracing::debug!(price = %p0, volume = book.matched_volume(), "mcafee single-price clearing");
                book.matched_pairs(Pairing::BestFirst)
                    .map(|pair| Settlement::new(pair.bid, pair.ask, p0, pair.quantity))
                    .collect()
            }
            None => {
                let mut remaining = book.matched_volume().saturating_sub(1);
                tracing::debug!(
                    buyer_price = %lowest_bid,
                    seller_price = %highest_ask,
                    volume = remaining,
                    "mcafee two-price clearing"
                );

                let mut settlements = Vec::new();
                for pair in book.matched_pairs(Pairing::BestFirst) {
                    if remaining == 0 {
                        break;
                    }
                    let quantity = pair
                        .quantity
                        .min(Quantity::try_from(remaining).unwrap_or(Quantity::MAX));
                    remaining -= u64::from(quantity);
                    settlements.push(Settlement::two_price(
                        pair.bid,
                        pair.ask,
                        lowest_bid,
                        highest_ask,
                        quantity,
                    ));
                }
                settlements
            }
        };

        execute_all(book, &settlements)?;
        Ok(settlements)
    }

    fn name(&self) -> &str {
        "mcafee"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderId, TraderId};
    use crate::engine::NullPricing;

    fn book_with(orders: &[(bool, i64, u32)]) -> OrderBook {
        let mut book = OrderBook::new();
        for (i, (is_bid, price, quantity)) in orders.iter().enumerate() {
            let id = OrderId::new(i as u64 + 1);
            let owner = TraderId::new(i as u64 + 1);
            let order = if *is_bid {
                Order::bid(Decimal::from(*price), *quantity, owner)
            } else {
                Order::ask(Decimal::from(*price), *quantity, owner)
            };
            book.insert(order.with_id(id)).unwrap();
        }
        book
    }

    fn clear(book: &mut OrderBook) -> Vec<Settlement> {
        let quote = book.quote();
        McAfeeClearing::new().clear(book, &NullPricing, &quote).unwrap()
    }

    #[test]
    fn test_efficient_single_price() {
        let mut book = book_with(&[(false, 40, 1), (true, 60, 1), (true, 45, 1), (false, 55, 1)]);
        assert_eq!(book.matched_volume(), 1);

        let settlements = clear(&mut book);

        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].price, Decimal::from(50));
        assert!(!settlements[0].is_two_price());
        assert_eq!(settlements[0].bid, OrderId::new(2));
        assert_eq!(settlements[0].ask, OrderId::new(1));
        // Unmatched boundary orders stay
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_two_price_fallback_excludes_marginal_unit() {
        let mut book = book_with(&[
            (true, 100, 1),
            (true, 90, 1),
            (true, 80, 1),
            (false, 50, 1),
            (false, 60, 1),
            (false, 70, 1),
        ]);
        assert_eq!(book.matched_volume(), 3);

        let settlements = clear(&mut book);

        assert_eq!(settlements.len(), 2);
        for settlement in &settlements {
            assert_eq!(settlement.price, Decimal::from(80));
            assert_eq!(settlement.seller_price, Decimal::from(70));
            assert_eq!(settlement.budget_surplus(), Decimal::from(10));
        }
        assert_eq!(
            (settlements[0].bid, settlements[0].ask),
            (OrderId::new(1), OrderId::new(4))
        );
        assert_eq!(
            (settlements[1].bid, settlements[1].ask),
            (OrderId::new(2), OrderId::new(5))
        );

        // The marginal pair stays matched for the next round
        assert_eq!(book.matched_volume(), 1);
        assert_eq!(book.lowest_matched_bid().map(Order::id), Some(OrderId::new(3)));
    }

    #[test]
    fn test_fallback_when_candidate_outside_range() {
        // p0 = (30 + 100) / 2 = 65 > 60: one matched unit, nothing trades
        let mut book = book_with(&[(false, 40, 1), (true, 60, 1), (true, 30, 1), (false, 100, 1)]);

        let settlements = clear(&mut book);

        assert!(settlements.is_empty());
        assert_eq!(book.matched_volume(), 1);
    }

    #[test]
    fn test_fallback_splits_partial_orders() {
        // One order per side, four matched units: three trade
        let mut book = book_with(&[(true, 100, 4), (false, 80, 4)]);

        let settlements = clear(&mut book);

        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].quantity, 3);
        assert_eq!(book.get(OrderId::new(1)).map(Order::remaining_quantity), Some(1));
    }

    #[test]
    fn test_single_price_near_decimal_limit() {
        let unmatched_bid = Decimal::MAX / Decimal::TWO + Decimal::from(1000);
        let mut book = OrderBook::new();
        let orders = [
            Order::bid(Decimal::MAX, 1, TraderId::new(1)),
            Order::ask(Decimal::ONE, 1, TraderId::new(2)),
            Order::bid(unmatched_bid, 1, TraderId::new(3)),
            Order::ask(Decimal::MAX, 1, TraderId::new(4)),
        ];
        for (i, order) in orders.into_iter().enumerate() {
            book.insert(order.with_id(OrderId::new(i as u64 + 1))).unwrap();
        }
        assert_eq!(book.matched_volume(), 1);

        let settlements = clear(&mut book);

        assert_eq!(settlements.len(), 1);
        assert!(!settlements[0].is_two_price());
        assert!(settlements[0].price > unmatched_bid);
        assert!(settlements[0].price < Decimal::MAX);
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_empty_book() {
        let mut book = OrderBook::new();
        assert!(clear(&mut book).is_empty());
    }
}
