// ============================================================================
// Domain Models Module
// Orders, the four-set book and the values that flow out of it
// ============================================================================

pub mod config;
pub mod order;
pub mod order_book;
pub mod quote;
pub mod settlement;
pub mod state;

pub use config::{
    AcceptanceType, AuctionConfig, BookPersistence, ClearingMode, ClearingType, PricingType,
};
pub use order::{Order, OrderBuilder, OrderId, Side, TraderId};
pub use order_book::{MatchedPair, MatchedPairs, OrderBook, Pairing};
pub use quote::MarketQuote;
pub use settlement::Settlement;
pub use state::AuctionState;
