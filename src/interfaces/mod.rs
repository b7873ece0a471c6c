// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod acceptance_policy;
mod clearing_policy;
mod event_handler;
mod pricing_policy;
mod settlement_handler;

pub use acceptance_policy::AcceptancePolicy;
pub use clearing_policy::ClearingPolicy;
pub use event_handler::{AuctionEvent, AuctionObserver, ChannelObserver, LoggingObserver, NoOpObserver};
pub use pricing_policy::PricingPolicy;
pub use settlement_handler::{NoOpSettlementHandler, SettlementHandler};
