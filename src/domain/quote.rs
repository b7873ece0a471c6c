// ============================================================================
// Market Quote
// ============================================================================

use crate::numeric::{midpoint, Price};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current bid/ask boundary, derived read-only from the order book.
///
/// The bid quote is the price a new bid must reach to become tradeable and
/// the ask quote the price a new ask must undercut; either is `None` when
/// the book holds nothing that defines it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarketQuote {
    pub bid: Option<Price>,
    pub ask: Option<Price>,
}

impl MarketQuote {
    pub const EMPTY: MarketQuote = MarketQuote {
        bid: None,
        ask: None,
    };

    pub fn new(bid: Option<Price>, ask: Option<Price>) -> Self {
        Self { bid, ask }
    }

    pub fn is_empty(&self) -> bool {
        self.bid.is_none() && self.ask.is_none()
    }

    /// Ask quote minus bid quote
    pub fn spread(&self) -> Option<Price> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    pub fn mid_price(&self) -> Option<Price> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some(midpoint(bid, ask)),
            _ => None,
        }
    }
}

impl fmt::Display for MarketQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn side(price: Option<Price>) -> String {
            price.map_or_else(|| "-".to_string(), |p| p.to_string())
        }
        write!(f, "{{bid: {}, ask: {}}}", side(self.bid), side(self.ask))
    }
}
