// ============================================================================
// Pricing Policy Interface
// Defines the contract for pricing matched bid/ask pairs
// ============================================================================

use crate::domain::{MarketQuote, Order};
use crate::errors::NullPricingError;
use crate::numeric::Price;

/// Strategy pattern interface for transaction pricing
/// Implementations: KPricing, UniformPricing, ArrivalPricing, NPricing, NullPricing
pub trait PricingPolicy: Send {
    /// Price one matched pair
    ///
    /// # Arguments
    /// * `bid` - Matched bid
    /// * `ask` - Matched ask, with `ask.price() <= bid.price()`
    /// * `quote` - Market quote captured when the clearing pass started
    fn price(&self, bid: &Order, ask: &Order, quote: &MarketQuote)
        -> Result<Price, NullPricingError>;

    /// Called by the auctioneer for every executed transaction
    fn record_transaction(&mut self, _price: Price) {}

    /// Forget recorded history (session close)
    fn reset(&mut self) {}

    /// Get the policy name for logging
    fn name(&self) -> &str;
}
