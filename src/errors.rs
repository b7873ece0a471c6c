// ============================================================================
// Error Types
// Typed failures for order flow, policies, clearing and configuration
// ============================================================================

use crate::domain::{AuctionState, OrderId, Side};
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Order Book Errors
// ============================================================================

/// An order with the same id is already resting in the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("order {0} is already resting in the book")]
pub struct DuplicateOrderError(pub OrderId);

/// No resting order carries the id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("order {0} is not resting in the book")]
pub struct NotFoundError(pub OrderId);

/// Structurally invalid order; never reaches the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedOrderError {
    #[error("price must be positive, got {0}")]
    NonPositivePrice(Price),

    #[error("quantity must be positive")]
    ZeroQuantity,

    #[error("filled quantity {filled} exceeds order quantity {quantity}")]
    Overfilled { filled: Quantity, quantity: Quantity },

    #[error("order was already filled by {filled} before submission")]
    AlreadyFilled { filled: Quantity },

    #[error("order side was not set")]
    MissingSide,

    #[error("order price was not set")]
    MissingPrice,
}

/// A fill that the matched sets cannot support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("order {order} is not a {expected}")]
    WrongSide { order: OrderId, expected: Side },

    #[error("order {order} has {available} matched units, {requested} requested")]
    InsufficientMatchedVolume {
        order: OrderId,
        requested: Quantity,
        available: Quantity,
    },
}

/// Broken four-set invariant. Only produced by
/// [`OrderBook::check_invariants`](crate::domain::OrderBook::check_invariants);
/// its presence means the engine itself is wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("matched bid at {bid} is below matched ask at {ask}")]
    MatchedSetCrossed { bid: Price, ask: Price },

    #[error("unmatched bid at {unmatched} beats matched bid at {matched}")]
    BidNotDisplaced { unmatched: Price, matched: Price },

    #[error("unmatched ask at {unmatched} beats matched ask at {matched}")]
    AskNotDisplaced { unmatched: Price, matched: Price },

    #[error("matched bid volume {bids} differs from matched ask volume {asks}")]
    UnbalancedVolume { bids: u64, asks: u64 },

    #[error("unmatched bid at {bid} crosses unmatched ask at {ask}")]
    UnmatchedCross { bid: Price, ask: Price },

    #[error("order {order} has {remaining} remaining units but {placed} placed in the sets")]
    PortionMismatch {
        order: OrderId,
        remaining: Quantity,
        placed: u64,
    },

    #[error("set entry refers to unknown order {0}")]
    OrphanEntry(OrderId),
}

// ============================================================================
// Policy Errors
// ============================================================================

/// Why an acceptance policy refused an order. `Copy` and allocation-free,
/// since every submission goes through these checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RejectionReason {
    #[error("{side} at {price} is not an improvement over the quote {quote}")]
    QuoteNotImproved { side: Side, price: Price, quote: Price },

    #[error("price {price} is outside the band [{floor}, {ceiling}]")]
    OutsidePriceBand {
        price: Price,
        floor: Price,
        ceiling: Price,
    },
}

/// Raised by a pricing policy that was deliberately configured to be unusable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
#[error("pricing policy cannot form prices; the clearing policy must price trades itself")]
pub struct NullPricingError;

// ============================================================================
// Auctioneer Errors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("auction is {0}; submissions are not accepted")]
    NotOpen(AuctionState),

    #[error(transparent)]
    Malformed(#[from] MalformedOrderError),

    #[error("order rejected: {0}")]
    Rejected(#[from] RejectionReason),

    #[error(transparent)]
    Duplicate(#[from] DuplicateOrderError),

    /// Every id up to `u64::MAX` has been handed out or claimed
    #[error("order ids are exhausted")]
    IdsExhausted,

    /// The order was admitted under `id` but the continuous clearing pass
    /// that followed it failed; the order stays in the book.
    #[error("order {id} admitted but clearing failed: {source}")]
    Clearing {
        id: OrderId,
        #[source]
        source: ClearError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WithdrawError {
    #[error("auction is {0}; withdrawals are not accepted")]
    NotOpen(AuctionState),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("order {0} was already cleared this round")]
    AlreadyCleared(OrderId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClearError {
    #[error(transparent)]
    Pricing(#[from] NullPricingError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Lifecycle hook called after `close_session`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
#[error("market session is closed")]
pub struct SessionClosedError;

// ============================================================================
// Configuration Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("market name cannot be empty")]
    EmptyMarket,

    #[error("interpolation weight k must lie in [0, 1], got {0}")]
    InvalidK(Decimal),

    #[error("price history window must be at least 1")]
    ZeroWindow,

    #[error("price band must satisfy 0 < floor <= ceiling, got [{floor}, {ceiling}]")]
    InvalidPriceBand { floor: Price, ceiling: Price },

    #[error("{clearing} clearing needs a pricing policy that can form prices")]
    PricingRequired { clearing: &'static str },

    #[error("{clearing} clearing requires periodic clearing mode")]
    PeriodicModeRequired { clearing: &'static str },

    #[cfg(feature = "serde")]
    #[error("invalid configuration document: {0}")]
    Parse(String),
}
