// ============================================================================
// Order Book Domain Model
// Four-set matching engine: matched/unmatched bids and asks
// ============================================================================

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use crate::errors::{DuplicateOrderError, ExecutionError, InvariantViolation, NotFoundError};
use crate::numeric::{Price, Quantity};

use super::{MarketQuote, Order, OrderId, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Priority Key
// ============================================================================

/// Sort key shared by all four sets. A greater key is a better order:
/// higher price for bids, lower price for asks, then earlier arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Priority {
    /// Price for bids, negated price for asks
    rank: Price,
    /// Admission time, then id
    arrival: Reverse<(u64, OrderId)>,
}

impl Priority {
    fn of(order: &Order) -> Self {
        let rank = match order.side() {
            Side::Bid => order.price(),
            Side::Ask => -order.price(),
        };
        Self {
            rank,
            arrival: Reverse(order.arrival()),
        }
    }

    fn order_id(&self) -> OrderId {
        self.arrival.0 .1
    }

    /// Book prices are strictly positive, so the rank's magnitude is the price
    fn price(&self) -> Price {
        self.rank.abs()
    }
}

// ============================================================================
// Tier
// ============================================================================

/// One of the four ordered sets. Maps an order to the part of its remaining
/// quantity that currently sits in this set.
#[derive(Debug, Clone, Default)]
struct Tier {
    entries: BTreeMap<Priority, Quantity>,
    volume: u64,
}

impl Tier {
    fn add(&mut self, key: Priority, quantity: Quantity) {
        if quantity == 0 {
            return;
        }
        *self.entries.entry(key).or_insert(0) += quantity;
        self.volume += u64::from(quantity);
    }

    /// Take up to `quantity` units from an entry; returns the units taken
    fn take(&mut self, key: Priority, quantity: Quantity) -> Quantity {
        let Some(held) = self.entries.get_mut(&key) else {
            return 0;
        };
        let taken = quantity.min(*held);
        *held -= taken;
        if *held == 0 {
            self.entries.remove(&key);
        }
        self.volume -= u64::from(taken);
        taken
    }

    fn remove(&mut self, key: Priority) -> Quantity {
        let held = self.entries.remove(&key).unwrap_or(0);
        self.volume -= u64::from(held);
        held
    }

    fn held(&self, key: &Priority) -> Quantity {
        self.entries.get(key).copied().unwrap_or(0)
    }

    fn best(&self) -> Option<(Priority, Quantity)> {
        self.entries.last_key_value().map(|(key, qty)| (*key, *qty))
    }

    fn worst(&self) -> Option<(Priority, Quantity)> {
        self.entries.first_key_value().map(|(key, qty)| (*key, *qty))
    }

    fn best_price(&self) -> Option<Price> {
        self.best().map(|(key, _)| key.price())
    }

    fn worst_price(&self) -> Option<Price> {
        self.worst().map(|(key, _)| key.price())
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.volume = 0;
    }
}

// ============================================================================
// Matched Pairs
// ============================================================================

/// Order in which matched bids and asks are walked together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pairing {
    /// Lowest matched bid with highest matched ask first (heap pop order)
    #[default]
    MarginalFirst,
    /// Highest matched bid with lowest matched ask first
    BestFirst,
}

/// A bid and an ask from the matched sets, with the volume they share
#[derive(Debug, Clone, Copy)]
pub struct MatchedPair<'a> {
    pub bid: &'a Order,
    pub ask: &'a Order,
    pub quantity: Quantity,
}

type TierIter<'a> = Box<dyn Iterator<Item = (&'a Priority, &'a Quantity)> + 'a>;

/// Lazy walk over the matched sets. Splits quantities so that both sides
/// of every yielded pair carry the same volume.
pub struct MatchedPairs<'a> {
    orders: &'a HashMap<OrderId, Order>,
    bids: TierIter<'a>,
    asks: TierIter<'a>,
    bid: Option<(OrderId, Quantity)>,
    ask: Option<(OrderId, Quantity)>,
}

impl<'a> Iterator for MatchedPairs<'a> {
    type Item = MatchedPair<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bid.is_none() {
            self.bid = self.bids.next().map(|(key, qty)| (key.order_id(), *qty));
        }
        if self.ask.is_none() {
            self.ask = self.asks.next().map(|(key, qty)| (key.order_id(), *qty));
        }

        let (bid_id, bid_left) = self.bid?;
        let (ask_id, ask_left) = self.ask?;
        let quantity = bid_left.min(ask_left);

        self.bid = (bid_left > quantity).then_some((bid_id, bid_left - quantity));
        self.ask = (ask_left > quantity).then_some((ask_id, ask_left - quantity));

        Some(MatchedPair {
            bid: self.orders.get(&bid_id)?,
            ask: self.orders.get(&ask_id)?,
            quantity,
        })
    }
}

// ============================================================================
// Order Book
// ============================================================================

/// Four-set double-auction book.
///
/// Resting volume is partitioned into matched bids, matched asks, unmatched
/// bids and unmatched asks. After every mutation:
///
/// 1. the lowest matched bid is at least the highest matched ask;
/// 2. no unmatched bid is priced above the lowest matched bid;
/// 3. no unmatched ask is priced below the highest matched ask;
/// 4. matched bid volume equals matched ask volume;
/// 5. the best unmatched bid is below the best unmatched ask.
///
/// Equal prices are ranked by arrival, so a later order never displaces an
/// earlier one at the same price. An order may be split between the
/// matched and unmatched set of its side.
///
/// Mutations only move volume between boundary entries; the book is never
/// re-sorted.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: HashMap<OrderId, Order>,
    matched_bids: Tier,
    matched_asks: Tier,
    unmatched_bids: Tier,
    unmatched_asks: Tier,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Insert a structurally valid order and restore the invariants.
    pub fn insert(&mut self, order: Order) -> Result<(), DuplicateOrderError> {
        let id = order.id();
        if self.orders.contains_key(&id) {
            return Err(DuplicateOrderError(id));
        }
        debug_assert!(order.validate().is_ok(), "malformed order {id} reached the book");

        let key = Priority::of(&order);
        let side = order.side();
        self.unmatched_mut(side).add(key, order.remaining_quantity());
        self.orders.insert(id, order);

        self.rebalance();
        tracing::trace!(order = %id, matched = self.matched_volume(), "order inserted");
        self.debug_check();
        Ok(())
    }

    /// Remove an order wherever it sits and restore the invariants.
    pub fn remove(&mut self, id: OrderId) -> Result<Order, NotFoundError> {
        let order = self.orders.remove(&id).ok_or(NotFoundError(id))?;
        let key = Priority::of(&order);
        let side = order.side();

        self.unmatched_mut(side).remove(key);
        let matched = self.matched_mut(side).remove(key);
        if matched > 0 {
            self.demote(side.opposite(), u64::from(matched));
        }

        self.rebalance();
        tracing::trace!(order = %id, matched = self.matched_volume(), "order removed");
        self.debug_check();
        Ok(order)
    }

    /// Fill `quantity` units of a matched bid against a matched ask.
    ///
    /// Both orders must hold at least `quantity` matched units. Fully filled
    /// orders leave the book.
    pub fn execute(
        &mut self,
        bid: OrderId,
        ask: OrderId,
        quantity: Quantity,
    ) -> Result<(), ExecutionError> {
        let bid_key = self.matched_portion(bid, Side::Bid, quantity)?;
        let ask_key = self.matched_portion(ask, Side::Ask, quantity)?;

        self.matched_bids.take(bid_key, quantity);
        self.matched_asks.take(ask_key, quantity);
        self.fill(bid, quantity);
        self.fill(ask, quantity);

        self.debug_check();
        Ok(())
    }

    /// Empty all four sets
    pub fn reset(&mut self) {
        self.orders.clear();
        self.matched_bids.clear();
        self.matched_asks.clear();
        self.unmatched_bids.clear();
        self.unmatched_asks.clear();
    }

    /// Empty the book, returning the resting orders in arrival order
    pub fn drain(&mut self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.orders.drain().map(|(_, order)| order).collect();
        orders.sort_by_key(Order::arrival);
        self.reset();
        orders
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Walk the matched sets as bid/ask pairs without mutating the book
    pub fn matched_pairs(&self, pairing: Pairing) -> MatchedPairs<'_> {
        let (bids, asks): (TierIter<'_>, TierIter<'_>) = match pairing {
            Pairing::MarginalFirst => (
                Box::new(self.matched_bids.entries.iter()),
                Box::new(self.matched_asks.entries.iter()),
            ),
            Pairing::BestFirst => (
                Box::new(self.matched_bids.entries.iter().rev()),
                Box::new(self.matched_asks.entries.iter().rev()),
            ),
        };

        MatchedPairs {
            orders: &self.orders,
            bids,
            asks,
            bid: None,
            ask: None,
        }
    }

    /// Price a new bid must reach to trade: the higher of the highest
    /// matched ask and the highest unmatched bid.
    pub fn best_bid_quote(&self) -> Option<Price> {
        self.matched_asks
            .worst_price()
            .max(self.unmatched_bids.best_price())
    }

    /// Price a new ask must undercut to trade: the lower of the lowest
    /// unmatched ask and the lowest matched bid.
    pub fn best_ask_quote(&self) -> Option<Price> {
        match (self.unmatched_asks.best_price(), self.matched_bids.worst_price()) {
            (Some(ask), Some(bid)) => Some(ask.min(bid)),
            (ask, None) => ask,
            (None, bid) => bid,
        }
    }

    pub fn quote(&self) -> MarketQuote {
        MarketQuote::new(self.best_bid_quote(), self.best_ask_quote())
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.orders.contains_key(&id)
    }

    /// Resting orders in no particular order
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Volume on each side of the matched sets
    pub fn matched_volume(&self) -> u64 {
        self.matched_bids.volume
    }

    /// Units of `order` currently in the matched set of its side
    pub fn matched_quantity(&self, id: OrderId) -> Quantity {
        self.orders
            .get(&id)
            .map(|order| self.matched(order.side()).held(&Priority::of(order)))
            .unwrap_or(0)
    }

    /// Remaining volume of every resting order, both sides
    pub fn resting_quantity(&self) -> u64 {
        self.matched_bids.volume
            + self.matched_asks.volume
            + self.unmatched_bids.volume
            + self.unmatched_asks.volume
    }

    pub fn highest_unmatched_bid(&self) -> Option<&Order> {
        self.order_at(self.unmatched_bids.best())
    }

    pub fn lowest_unmatched_ask(&self) -> Option<&Order> {
        self.order_at(self.unmatched_asks.best())
    }

    pub fn lowest_matched_bid(&self) -> Option<&Order> {
        self.order_at(self.matched_bids.worst())
    }

    pub fn highest_matched_ask(&self) -> Option<&Order> {
        self.order_at(self.matched_asks.worst())
    }

    /// Aggregated (price, volume) levels for one side, best first
    pub fn depth(&self, side: Side, levels: usize) -> Vec<(Price, u64)> {
        let mut by_rank: BTreeMap<Price, u64> = BTreeMap::new();
        let entries = self
            .matched(side)
            .entries
            .iter()
            .chain(self.unmatched(side).entries.iter());
        for (key, qty) in entries {
            *by_rank.entry(key.rank).or_insert(0) += u64::from(*qty);
        }

        by_rank
            .into_iter()
            .rev()
            .take(levels)
            .map(|(rank, qty)| (rank.abs(), qty))
            .collect()
    }

    /// Audit every invariant plus the per-order bookkeeping.
    ///
    /// Linear in the size of the book; mutations run it under
    /// `debug_assert!` only.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if let (Some(bid), Some(ask)) = (
            self.matched_bids.worst_price(),
            self.matched_asks.worst_price(),
        ) {
            if bid < ask {
                return Err(InvariantViolation::MatchedSetCrossed { bid, ask });
            }
        }

        if let (Some(unmatched), Some(matched)) = (
            self.unmatched_bids.best_price(),
            self.matched_bids.worst_price(),
        ) {
            if unmatched > matched {
                return Err(InvariantViolation::BidNotDisplaced { unmatched, matched });
            }
        }

        if let (Some(unmatched), Some(matched)) = (
            self.unmatched_asks.best_price(),
            self.matched_asks.worst_price(),
        ) {
            if unmatched < matched {
                return Err(InvariantViolation::AskNotDisplaced { unmatched, matched });
            }
        }

        if self.matched_bids.volume != self.matched_asks.volume {
            return Err(InvariantViolation::UnbalancedVolume {
                bids: self.matched_bids.volume,
                asks: self.matched_asks.volume,
            });
        }

        if let (Some(bid), Some(ask)) = (
            self.unmatched_bids.best_price(),
            self.unmatched_asks.best_price(),
        ) {
            if bid >= ask {
                return Err(InvariantViolation::UnmatchedCross { bid, ask });
            }
        }

        let mut placed: HashMap<OrderId, u64> = HashMap::with_capacity(self.orders.len());
        for tier in [
            &self.matched_bids,
            &self.matched_asks,
            &self.unmatched_bids,
            &self.unmatched_asks,
        ] {
            for (key, qty) in &tier.entries {
                let id = key.order_id();
                if !self.orders.contains_key(&id) {
                    return Err(InvariantViolation::OrphanEntry(id));
                }
                *placed.entry(id).or_insert(0) += u64::from(*qty);
            }
        }

        for order in self.orders.values() {
            let placed = placed.get(&order.id()).copied().unwrap_or(0);
            if placed != u64::from(order.remaining_quantity()) {
                return Err(InvariantViolation::PortionMismatch {
                    order: order.id(),
                    remaining: order.remaining_quantity(),
                    placed,
                });
            }
        }

        Ok(())
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn matched(&self, side: Side) -> &Tier {
        match side {
            Side::Bid => &self.matched_bids,
            Side::Ask => &self.matched_asks,
        }
    }

    fn unmatched(&self, side: Side) -> &Tier {
        match side {
            Side::Bid => &self.unmatched_bids,
            Side::Ask => &self.unmatched_asks,
        }
    }

    fn matched_mut(&mut self, side: Side) -> &mut Tier {
        match side {
            Side::Bid => &mut self.matched_bids,
            Side::Ask => &mut self.matched_asks,
        }
    }

    fn unmatched_mut(&mut self, side: Side) -> &mut Tier {
        match side {
            Side::Bid => &mut self.unmatched_bids,
            Side::Ask => &mut self.unmatched_asks,
        }
    }

    fn order_at(&self, entry: Option<(Priority, Quantity)>) -> Option<&Order> {
        entry.and_then(|(key, _)| self.orders.get(&key.order_id()))
    }

    /// Move boundary volume until no step applies. Displacement runs before
    /// promotion so that promoted orders are always the best unmatched ones.
    fn rebalance(&mut self) {
        while self.displace(Side::Bid) || self.displace(Side::Ask) || self.promote() {}
    }

    /// Swap volume between the best unmatched and the worst matched order of
    /// one side when the unmatched one has priority. Matched volume is
    /// unchanged.
    fn displace(&mut self, side: Side) -> bool {
        let (Some((challenger, free)), Some((incumbent, held))) =
            (self.unmatched(side).best(), self.matched(side).worst())
        else {
            return false;
        };
        if challenger <= incumbent {
            return false;
        }

        let quantity = free.min(held);
        self.unmatched_mut(side).take(challenger, quantity);
        self.matched_mut(side).take(incumbent, quantity);
        self.matched_mut(side).add(challenger, quantity);
        self.unmatched_mut(side).add(incumbent, quantity);
        true
    }

    /// Match the best unmatched bid with the best unmatched ask when they
    /// cross.
    fn promote(&mut self) -> bool {
        let (Some((bid, bid_free)), Some((ask, ask_free))) =
            (self.unmatched_bids.best(), self.unmatched_asks.best())
        else {
            return false;
        };
        if bid.price() < ask.price() {
            return false;
        }

        let quantity = bid_free.min(ask_free);
        self.unmatched_bids.take(bid, quantity);
        self.unmatched_asks.take(ask, quantity);
        self.matched_bids.add(bid, quantity);
        self.matched_asks.add(ask, quantity);
        true
    }

    /// Move `volume` units from the worst matched orders of `side` back to
    /// the unmatched set.
    fn demote(&mut self, side: Side, mut volume: u64) {
        while volume > 0 {
            let Some((key, held)) = self.matched(side).worst() else {
                break;
            };
            let quantity = held.min(Quantity::try_from(volume).unwrap_or(Quantity::MAX));
            self.matched_mut(side).take(key, quantity);
            self.unmatched_mut(side).add(key, quantity);
            volume -= u64::from(quantity);
        }
    }

    fn matched_portion(
        &self,
        id: OrderId,
        side: Side,
        quantity: Quantity,
    ) -> Result<Priority, ExecutionError> {
        let order = self.orders.get(&id).ok_or(NotFoundError(id))?;
        if order.side() != side {
            return Err(ExecutionError::WrongSide {
                order: id,
                expected: side,
            });
        }

        let key = Priority::of(order);
        let available = self.matched(side).held(&key);
        if available < quantity {
            return Err(ExecutionError::InsufficientMatchedVolume {
                order: id,
                requested: quantity,
                available,
            });
        }
        Ok(key)
    }

    fn fill(&mut self, id: OrderId, quantity: Quantity) {
        if let Some(order) = self.orders.get_mut(&id) {
            order.fill(quantity);
            if order.is_filled() {
                self.orders.remove(&id);
            }
        }
    }

    fn debug_check(&self) {
        if cfg!(debug_assertions) {
            if let Err(violation) = self.check_invariants() {
                panic!("order book invariant violated: {violation}");
            }
        }
    }
}
