// ============================================================================
// Order Domain Model
// ============================================================================

use crate::errors::MalformedOrderError;
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

/// Order identifier. The auctioneer assigns ids monotonically, but callers
/// may supply their own, so arrival is ranked on the admission clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderId(u64);

impl OrderId {
    /// Id carried by an order that has not been admitted yet
    pub const UNASSIGNED: OrderId = OrderId(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle of the agent that owns an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraderId(u64);

impl TraderId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trader-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// Buy intention
    Bid,
    /// Sell intention
    Ask,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => f.write_str("bid"),
            Side::Ask => f.write_str("ask"),
        }
    }
}

// ============================================================================
// Order Entity
// ============================================================================

/// A single buy or sell intention (a "shout").
///
/// Fields are read-only. Once an order is inserted into an
/// [`OrderBook`](crate::domain::OrderBook) the book owns it and only a
/// clearing pass advances its filled quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Order {
    id: OrderId,
    side: Side,
    price: Price,
    quantity: Quantity,
    filled_quantity: Quantity,
    owner: TraderId,
    submitted_at: u64,
}

impl Order {
    /// Create an order that has not been admitted yet
    pub fn new(side: Side, price: Price, quantity: Quantity, owner: TraderId) -> Self {
        Self {
            id: OrderId::UNASSIGNED,
            side,
            price,
            quantity,
            filled_quantity: 0,
            owner,
            submitted_at: 0,
        }
    }

    pub fn bid(price: Price, quantity: Quantity, owner: TraderId) -> Self {
        Self::new(Side::Bid, price, quantity, owner)
    }

    pub fn ask(price: Price, quantity: Quantity, owner: TraderId) -> Self {
        Self::new(Side::Ask, price, quantity, owner)
    }

    pub fn builder() -> OrderBuilder {
        OrderBuilder::default()
    }

    /// Attach an id chosen by the caller. Used by collaborators that
    /// allocate ids themselves and when driving an `OrderBook` directly.
    pub fn with_id(mut self, id: OrderId) -> Self {
        self.id = id;
        self
    }

    // ========================================================================
    // Getters
    // ========================================================================

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn filled_quantity(&self) -> Quantity {
        self.filled_quantity
    }

    pub fn remaining_quantity(&self) -> Quantity {
        self.quantity - self.filled_quantity
    }

    pub fn owner(&self) -> TraderId {
        self.owner
    }

    /// Logical admission time
    pub fn submitted_at(&self) -> u64 {
        self.submitted_at
    }

    pub fn is_bid(&self) -> bool {
        self.side == Side::Bid
    }

    pub fn is_ask(&self) -> bool {
        self.side == Side::Ask
    }

    pub fn is_filled(&self) -> bool {
        self.filled_quantity == self.quantity
    }

    /// Whether this order arrived before `other`
    pub fn arrived_before(&self, other: &Order) -> bool {
        self.arrival() < other.arrival()
    }

    /// Admission time, then id. Orders placed in a book directly carry no
    /// admission time and fall back to id order.
    pub(crate) fn arrival(&self) -> (u64, OrderId) {
        (self.submitted_at, self.id)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Structural validation: positive price, positive quantity and a
    /// filled quantity that does not exceed the order size.
    pub fn validate(&self) -> Result<(), MalformedOrderError> {
        if self.price <= Decimal::ZERO {
            return Err(MalformedOrderError::NonPositivePrice(self.price));
        }
        if self.quantity == 0 {
            return Err(MalformedOrderError::ZeroQuantity);
        }
        if self.filled_quantity > self.quantity {
            return Err(MalformedOrderError::Overfilled {
                filled: self.filled_quantity,
                quantity: self.quantity,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Crate-internal mutation
    // ========================================================================

    /// Stamp id and logical time on admission
    pub(crate) fn admit(&mut self, id: OrderId, submitted_at: u64) {
        self.id = id;
        self.submitted_at = submitted_at;
    }

    /// Advance the filled quantity; the caller guarantees `quantity` does
    /// not exceed the remaining quantity.
    pub(crate) fn fill(&mut self, quantity: Quantity) {
        debug_assert!(quantity <= self.remaining_quantity());
        self.filled_quantity += quantity;
    }
}

// ============================================================================
// Order Builder
// ============================================================================

/// Mutable order under construction, filled in by a trading strategy
/// before submission.
#[derive(Debug, Clone, Default)]
pub struct OrderBuilder {
    side: Option<Side>,
    price: Option<Price>,
    quantity: Quantity,
    owner: TraderId,
}

impl OrderBuilder {
    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn bid(self) -> Self {
        self.side(Side::Bid)
    }

    pub fn ask(self) -> Self {
        self.side(Side::Ask)
    }

    pub fn price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn owner(mut self, owner: TraderId) -> Self {
        self.owner = owner;
        self
    }

    pub fn set_price(&mut self, price: Price) {
        self.price = Some(price);
    }

    pub fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }

    /// Build and validate the order
    pub fn build(self) -> Result<Order, MalformedOrderError> {
        let side = self.side.ok_or(MalformedOrderError::MissingSide)?;
        let price = self.price.ok_or(MalformedOrderError::MissingPrice)?;
        let order = Order::new(side, price, self.quantity, self.owner);
        order.validate()?;
        Ok(order)
    }
}
