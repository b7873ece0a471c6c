// ============================================================================
// Double Auction Library
// Four-heap matching engine with pluggable pricing, acceptance and clearing
// ============================================================================

//! # Double Auction
//!
//! An incremental double-auction matching engine for market simulations.
//!
//! ## Features
//!
//! - **Four-heap order book** keeping the matched set maximal under
//!   insertion, withdrawal and partial fills in logarithmic time
//! - **Pluggable policies** for transaction pricing, order acceptance and
//!   clearing (continuous double auction, clearing house, McAfee)
//! - **Observers** for lifecycle events (logging, channels)
//! - **Typed configuration** with presets and a fluent builder
//!
//! ## Example
//!
//! ```rust
//! use double_auction::prelude::*;
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! // Continuous double auction, trades priced halfway between bid and ask
//! let mut auction = Auctioneer::new(
//!     "WIDGETS",
//!     ClearingMode::Continuous,
//!     Box::new(KPricing::new(Decimal::new(5, 1)).unwrap()),
//!     Box::new(StandardClearing::default()),
//! )
//! .with_observer(Arc::new(LoggingObserver));
//!
//! auction
//!     .submit(Order::ask(Decimal::from(80), 1, TraderId::new(1)))
//!     .unwrap();
//! println!("Quote: {}", auction.quote());
//!
//! auction
//!     .submit(Order::bid(Decimal::from(100), 1, TraderId::new(2)))
//!     .unwrap();
//! assert!(auction.book().is_empty());
//! ```

pub mod domain;
pub mod engine;
pub mod errors;
pub mod interfaces;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        AcceptanceType, AuctionConfig, AuctionState, BookPersistence, ClearingMode,
        ClearingType, MarketQuote, Order, OrderBook, OrderBuilder, OrderId, Pairing,
        PricingType, Settlement, Side, TraderId,
    };
    pub use crate::engine::{
        create_from_config, AlwaysAccept, ArrivalPricing, Auctioneer, AuctioneerBuilder,
        KPricing, McAfeeClearing, NPricing, NoQueueClearing, NullPricing, PriceBand,
        QuoteBeating, SharedAuctioneer, StandardClearing, UniformPricing,
    };
    pub use crate::errors::{
        ClearError, ConfigError, RejectionReason, SubmitError, WithdrawError,
    };
    pub use crate::interfaces::{
        AcceptancePolicy, AuctionEvent, AuctionObserver, ChannelObserver, ClearingPolicy,
        LoggingObserver, NoOpObserver, NoOpSettlementHandler, PricingPolicy, SettlementHandler,
    };
    pub use crate::numeric::{Price, Quantity};
}
