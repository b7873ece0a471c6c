// ============================================================================
// Clearing Policy Interface
// Defines the contract for turning matched pairs into settlements
// ============================================================================

use crate::domain::{MarketQuote, OrderBook, Settlement};
use crate::errors::ClearError;
use crate::interfaces::PricingPolicy;

/// Strategy pattern interface for clearing mechanisms
/// Implementations: StandardClearing, NoQueueClearing, McAfeeClearing
pub trait ClearingPolicy: Send {
    /// Execute the pairs this mechanism clears now
    ///
    /// # Arguments
    /// * `book` - Order book; fills are applied through `OrderBook::execute`
    /// * `pricing` - Pricing policy of the auctioneer
    /// * `quote` - Market quote captured before any fill
    ///
    /// # Returns
    /// Settlements in execution order. On error no fill has been applied.
    fn clear(
        &self,
        book: &mut OrderBook,
        pricing: &dyn PricingPolicy,
        quote: &MarketQuote,
    ) -> Result<Vec<Settlement>, ClearError>;

    /// Get the mechanism name for logging
    fn name(&self) -> &str;
}
