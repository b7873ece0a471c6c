// ============================================================================
// Settlement Domain Model
// ============================================================================

use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;

use super::{Order, OrderId, TraderId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One executed transaction between a matched bid and ask, handed to the
/// settlement collaborator that moves funds and goods.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settlement {
    /// Bid order that bought
    pub bid: OrderId,

    /// Ask order that sold
    pub ask: OrderId,

    pub buyer: TraderId,

    pub seller: TraderId,

    /// Unit price paid by the buyer
    pub price: Price,

    /// Unit price received by the seller. Equal to `price` except under
    /// two-price mechanisms.
    pub seller_price: Price,

    /// Executed quantity
    pub quantity: Quantity,
}

impl Settlement {
    /// Single-price settlement between two orders
    pub fn new(bid: &Order, ask: &Order, price: Price, quantity: Quantity) -> Self {
        Self {
            bid: bid.id(),
            ask: ask.id(),
            buyer: bid.owner(),
            seller: ask.owner(),
            price,
            seller_price: price,
            quantity,
        }
    }

    /// Two-price settlement: the buyer pays `price`, the seller receives
    /// `seller_price`
    pub fn two_price(
        bid: &Order,
        ask: &Order,
        price: Price,
        seller_price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            seller_price,
            ..Self::new(bid, ask, price, quantity)
        }
    }

    /// Amount paid by the buyer (price * quantity)
    pub fn notional(&self) -> Price {
        self.price * Decimal::from(self.quantity)
    }

    /// Amount kept by the auctioneer; zero for single-price settlements
    pub fn budget_surplus(&self) -> Price {
        (self.price - self.seller_price) * Decimal::from(self.quantity)
    }

    pub fn is_two_price(&self) -> bool {
        self.price != self.seller_price
    }
}
