// ============================================================================
// Clearing Policies
// Standard and no-queue clearing of the matched sets
// ============================================================================

use crate::domain::{MarketQuote, OrderBook, Pairing, Settlement};
use crate::errors::{ClearError, ExecutionError, NullPricingError};
use crate::interfaces::{ClearingPolicy, PricingPolicy};

/// Price every matched pair without touching the book
pub(crate) fn price_pairs(
    book: &OrderBook,
    pairing: Pairing,
    pricing: &dyn PricingPolicy,
    quote: &MarketQuote,
) -> Result<Vec<Settlement>, NullPricingError> {
    book.matched_pairs(pairing)
        .map(|pair| {
            let price = pricing.price(pair.bid, pair.ask, quote)?;
            Ok(Settlement::new(pair.bid, pair.ask, price, pair.quantity))
        })
        .collect()
}

/// Apply planned settlements to the book in order
pub(crate) fn execute_all(
    book: &mut OrderBook,
    settlements: &[Settlement],
) -> Result<(), ExecutionError> {
    for settlement in settlements {
        book.execute(settlement.bid, settlement.ask, settlement.quantity)?;
    }
    Ok(())
}

/// Executes every matched pair once; unmatched orders stay for the next
/// round.
///
/// # Example
/// ```text
/// Book:  bid 100 x 3 | ask 80 x 1, ask 90 x 1     (k = 0.5, best first)
/// Result: 1 @ 90, 1 @ 95; bid keeps 1 unit unmatched
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StandardClearing {
    pairing: Pairing,
}

impl StandardClearing {
    pub fn new(pairing: Pairing) -> Self {
        Self { pairing }
    }

    pub fn pairing(&self) -> Pairing {
        self.pairing
    }
}

impl ClearingPolicy for StandardClearing {
    fn clear(
        &self,
        book: &mut OrderBook,
        pricing: &dyn PricingPolicy,
        quote: &MarketQuote,
    ) -> Result<Vec<Settlement>, ClearError> {
        let settlements = price_pairs(book, self.pairing, pricing, quote)?;
        execute_all(book, &settlements)?;
        Ok(settlements)
    }

    fn name(&self) -> &str {
        "standard"
    }
}

/// Standard clearing followed by discarding every order left in the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoQueueClearing {
    inner: StandardClearing,
}

impl NoQueueClearing {
    pub fn new(pairing: Pairing) -> Self {
        Self {
            inner: StandardClearing::new(pairing),
        }
    }

    pub fn pairing(&self) -> Pairing {
        self.inner.pairing()
    }
}

impl ClearingPolicy for NoQueueClearing {
    fn clear(
        &self,
        book: &mut OrderBook,
        pricing: &dyn PricingPolicy,
        quote: &MarketQuote,
    ) -> Result<Vec<Settlement>, ClearError> {
        let settlements = self.inner.clear(book, pricing, quote)?;
        tracing::trace!(discarded = book.len(), "no-queue clearing resets the book");
        book.reset();
        Ok(settlements)
    }

    fn name(&self) -> &str {
        "no-queue"
    }
}
