// ============================================================================
// Acceptance Policy Interface
// Defines the contract for admitting orders into the book
// ============================================================================

use crate::domain::{MarketQuote, Order};
use crate::errors::RejectionReason;

/// Admission predicate applied to every structurally valid order before it
/// reaches the book. Rejection is an ordinary outcome, not a fault.
pub trait AcceptancePolicy: Send {
    fn check(&self, order: &Order, quote: &MarketQuote) -> Result<(), RejectionReason>;

    /// Get the policy name for logging
    fn name(&self) -> &str;
}
