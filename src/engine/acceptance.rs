// ============================================================================
// Acceptance Policies
// Admission rules applied before an order enters the book
// ============================================================================

use crate::domain::config::check_band;
use crate::domain::{MarketQuote, Order, Side};
use crate::errors::{ConfigError, RejectionReason};
use crate::interfaces::AcceptancePolicy;
use crate::numeric::Price;

/// Admits every structurally valid order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlwaysAccept;

impl AcceptancePolicy for AlwaysAccept {
    fn check(&self, _order: &Order, _quote: &MarketQuote) -> Result<(), RejectionReason> {
        Ok(())
    }

    fn name(&self) -> &str {
        "always-accept"
    }
}

/// NYSE quote-beating rule
///
/// A new bid must be priced at or above the current bid quote and a new ask
/// at or below the current ask quote. A missing quote side admits anything.
///
/// # Example
/// ```text
/// Quote: {bid: 90, ask: 95}
/// Bid @ 80  => rejected (QuoteNotImproved)
/// Bid @ 91  => admitted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuoteBeating;

impl AcceptancePolicy for QuoteBeating {
    fn check(&self, order: &Order, quote: &MarketQuote) -> Result<(), RejectionReason> {
        let price = order.price();
        let side = order.side();
        let beaten = match side {
            Side::Bid => quote.bid.filter(|bid_quote| price < *bid_quote),
            Side::Ask => quote.ask.filter(|ask_quote| price > *ask_quote),
        };

        match beaten {
            Some(quote) => Err(RejectionReason::QuoteNotImproved { side, price, quote }),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "quote-beating"
    }
}

/// Rejects prices outside `[floor, ceiling]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBand {
    floor: Price,
    ceiling: Price,
}

impl PriceBand {
    pub fn new(floor: Price, ceiling: Price) -> Result<Self, ConfigError> {
        check_band(floor, ceiling)?;
        Ok(Self { floor, ceiling })
    }

    pub fn floor(&self) -> Price {
        self.floor
    }

    pub fn ceiling(&self) -> Price {
        self.ceiling
    }
}

impl AcceptancePolicy for PriceBand {
    fn check(&self, order: &Order, _quote: &MarketQuote) -> Result<(), RejectionReason> {
        let price = order.price();
        if price < self.floor || price > self.ceiling {
            return Err(RejectionReason::OutsidePriceBand {
                price,
                floor: self.floor,
                ceiling: self.ceiling,
            });
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "price-band"
    }
}
