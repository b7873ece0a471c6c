// ============================================================================
// Engine Module
// Policy implementations and the auctioneer that drives them
// ============================================================================

mod acceptance;
mod auctioneer;
mod clearing;
mod mcafee;
mod n_pricing;
mod pricing;
mod shared;

pub mod factory;

pub use acceptance::{AlwaysAccept, PriceBand, QuoteBeating};
pub use auctioneer::Auctioneer;
pub use clearing::{NoQueueClearing, StandardClearing};
pub use factory::{create_from_config, AuctioneerBuilder};
pub use mcafee::McAfeeClearing;
pub use n_pricing::NPricing;
pub use pricing::{ArrivalPricing, KPricing, NullPricing, UniformPricing};
pub use shared::SharedAuctioneer;
