// ============================================================================
// Auctioneer
// Orchestrates one market session: admission, clearing and lifecycle hooks
// ============================================================================

use std::cell::Cell;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use smallvec::SmallVec;
use uuid::Uuid;

use crate::domain::{
    AuctionState, BookPersistence, ClearingMode, MarketQuote, Order, OrderBook, OrderId,
    Settlement,
};
use crate::errors::{ClearError, MalformedOrderError, SessionClosedError, SubmitError, WithdrawError};
use crate::interfaces::{
    AcceptancePolicy, AuctionEvent, AuctionObserver, ClearingPolicy, NoOpObserver,
    NoOpSettlementHandler, PricingPolicy, SettlementHandler,
};

/// Market session driver with pluggable pricing, acceptance and clearing
///
/// ```text
/// submit ─► validate ─► acceptance ─► OrderBook::insert ─┬─► (continuous) clear
///                                                        └─► (periodic) wait for clear()
/// ```
pub struct Auctioneer {
    /// Market name (e.g. "WIDGETS")
    market: String,

    /// Identifies this session in observer events
    session_id: Uuid,

    mode: ClearingMode,

    book_persistence: BookPersistence,

    book: OrderBook,

    pricing: Box<dyn PricingPolicy>,

    /// All must accept; the first rejection is reported
    acceptance: SmallVec<[Box<dyn AcceptancePolicy>; 2]>,

    clearing: Box<dyn ClearingPolicy>,

    settlement_handler: Box<dyn SettlementHandler>,

    observer: Arc<dyn AuctionObserver>,

    state: AuctionState,

    /// Cached quote; `None` when stale
    quote: Cell<Option<MarketQuote>>,

    /// Highest order id handed out or seen so far
    next_order_id: u64,

    /// Logical time, advanced on every admission
    clock: u64,

    round: u64,

    day: u64,

    /// Orders that traded in the current round (continuous mode only)
    cleared_this_round: HashSet<OrderId>,
}

impl Auctioneer {
    /// Create an auctioneer that accepts every valid order
    pub fn new(
        market: impl Into<String>,
        mode: ClearingMode,
        pricing: Box<dyn PricingPolicy>,
        clearing: Box<dyn ClearingPolicy>,
    ) -> Self {
        Self {
            market: market.into(),
            session_id: Uuid::new_v4(),
            mode,
            book_persistence: BookPersistence::default(),
            book: OrderBook::new(),
            pricing,
            acceptance: SmallVec::new(),
            clearing,
            settlement_handler: Box::new(NoOpSettlementHandler),
            observer: Arc::new(NoOpObserver),
            state: AuctionState::Open,
            quote: Cell::new(None),
            next_order_id: 0,
            clock: 0,
            round: 0,
            day: 0,
            cleared_this_round: HashSet::new(),
        }
    }

    /// Add an acceptance policy
    pub fn with_acceptance_policy(mut self, policy: Box<dyn AcceptancePolicy>) -> Self {
        self.acceptance.push(policy);
        self
    }

    pub fn with_settlement_handler(mut self, handler: Box<dyn SettlementHandler>) -> Self {
        self.settlement_handler = handler;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn AuctionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_book_persistence(mut self, persistence: BookPersistence) -> Self {
        self.book_persistence = persistence;
        self
    }

    // ========================================================================
    // Order flow
    // ========================================================================

    /// Submit an order; returns the id it was admitted under
    pub fn submit(&mut self, order: Order) -> Result<OrderId, SubmitError> {
        let next = self
            .next_order_id
            .checked_add(1)
            .ok_or(SubmitError::IdsExhausted)?;
        self.admit(order, OrderId::new(next))
    }

    /// Submit an order under an id allocated by the caller. Arrival priority
    /// still follows submission order, whatever the id.
    pub fn submit_with_id(&mut self, order: Order, id: OrderId) -> Result<OrderId, SubmitError> {
        self.admit(order, id)
    }

    /// Withdraw a resting order, returning it with its fills so far
    pub fn withdraw(&mut self, id: OrderId) -> Result<Order, WithdrawError> {
        if !self.state.accepts_orders() {
            return Err(WithdrawError::NotOpen(self.state));
        }
        if self.mode.is_continuous() && self.cleared_this_round.contains(&id) {
            return Err(WithdrawError::AlreadyCleared(id));
        }

        let order = self.book.remove(id)?;
        self.quote.set(None);

        tracing::debug!(market = %self.market, order = %id, "order withdrawn");
        self.observer.on_event(AuctionEvent::OrderWithdrawn {
            session: self.session_id,
            order_id: id,
            timestamp: Utc::now(),
        });
        Ok(order)
    }

    /// Run the clearing policy over the book
    ///
    /// On a closed session nothing is cleared. Every settlement is recorded
    /// by the pricing policy and handed to the settlement handler.
    pub fn clear(&mut self) -> Result<Vec<Settlement>, ClearError> {
        if self.state.is_terminal() {
            return Ok(Vec::new());
        }

        self.transition(AuctionState::Clearing);
        let quote = self.book.quote();
        let result = self
            .clearing
            .clear(&mut self.book, self.pricing.as_ref(), &quote);
        self.quote.set(None);
        self.transition(AuctionState::Open);

        let settlements = result?;
        for settlement in &settlements {
            self.pricing.record_transaction(settlement.price);
            self.settlement_handler.on_settlement(settlement);
            if self.mode.is_continuous() {
                self.cleared_this_round.insert(settlement.bid);
                self.cleared_this_round.insert(settlement.ask);
            }
        }

        tracing::debug!(
            market = %self.market,
            clearing = self.clearing.name(),
            round = self.round,
            settlements = settlements.len(),
            "clearing finished"
        );
        self.observer.on_event(AuctionEvent::RoundCleared {
            session: self.session_id,
            round: self.round,
            settlements: settlements.clone(),
            timestamp: Utc::now(),
        });
        Ok(settlements)
    }

    /// Current market quote, regenerated lazily after book changes
    pub fn quote(&self) -> MarketQuote {
        if let Some(quote) = self.quote.get() {
            return quote;
        }
        let quote = self.book.quote();
        self.quote.set(Some(quote));
        quote
    }

    // ========================================================================
    // Scheduler hooks
    // ========================================================================

    pub fn open_round(&mut self) -> Result<(), SessionClosedError> {
        self.ensure_live()?;
        self.round += 1;
        self.cleared_this_round.clear();
        if self.book_persistence == BookPersistence::Round {
            self.reset_book();
        }

        tracing::debug!(market = %self.market, day = self.day, round = self.round, "round opened");
        self.observer.on_event(AuctionEvent::RoundOpened {
            session: self.session_id,
            day: self.day,
            round: self.round,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    pub fn open_day(&mut self) -> Result<(), SessionClosedError> {
        self.ensure_live()?;
        self.day += 1;
        self.round = 0;
        self.cleared_this_round.clear();
        if self.book_persistence != BookPersistence::Session {
            self.reset_book();
        }

        tracing::info!(market = %self.market, day = self.day, "day opened");
        self.observer.on_event(AuctionEvent::DayOpened {
            session: self.session_id,
            day: self.day,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// End the session. Returns the orders still resting, in arrival order.
    pub fn close_session(&mut self) -> Vec<Order> {
        if self.state.is_terminal() {
            return Vec::new();
        }

        let discarded = self.book.drain();
        self.pricing.reset();
        self.cleared_this_round.clear();
        self.quote.set(None);
        self.transition(AuctionState::Closed);

        tracing::info!(market = %self.market, discarded = discarded.len(), "session closed");
        self.observer.on_event(AuctionEvent::SessionClosed {
            session: self.session_id,
            discarded: discarded.len(),
            timestamp: Utc::now(),
        });
        discarded
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> AuctionState {
        self.state
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn day(&self) -> u64 {
        self.day
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn mode(&self) -> ClearingMode {
        self.mode
    }

    pub fn book_persistence(&self) -> BookPersistence {
        self.book_persistence
    }

    pub fn pricing(&self) -> &dyn PricingPolicy {
        self.pricing.as_ref()
    }

    pub fn clearing(&self) -> &dyn ClearingPolicy {
        self.clearing.as_ref()
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn admit(&mut self, mut order: Order, id: OrderId) -> Result<OrderId, SubmitError> {
        if !self.state.accepts_orders() {
            return Err(SubmitError::NotOpen(self.state));
        }

        order.validate()?;
        if order.filled_quantity() > 0 {
            return Err(MalformedOrderError::AlreadyFilled {
                filled: order.filled_quantity(),
            }
            .into());
        }

        let quote = self.quote();
        for policy in &self.acceptance {
            if let Err(reason) = policy.check(&order, &quote) {
                tracing::debug!(
                    market = %self.market,
                    policy = policy.name(),
                    %reason,
                    "order rejected"
                );
                self.observer.on_event(AuctionEvent::OrderRejected {
                    session: self.session_id,
                    owner: order.owner(),
                    side: order.side(),
                    price: order.price(),
                    reason,
                    timestamp: Utc::now(),
                });
                return Err(reason.into());
            }
        }

        order.admit(id, self.clock + 1);
        let (side, price, quantity) = (order.side(), order.price(), order.quantity());
        self.book.insert(order)?;
        self.clock += 1;
        self.next_order_id = self.next_order_id.max(id.value());
        self.quote.set(None);

        tracing::debug!(market = %self.market, order = %id, %side, %price, quantity, "order accepted");
        self.observer.on_event(AuctionEvent::OrderAccepted {
            session: self.session_id,
            order_id: id,
            side,
            price,
            quantity,
            timestamp: Utc::now(),
        });

        if self.mode.is_continuous() {
            self.clear()
                .map_err(|source| SubmitError::Clearing { id, source })?;
        }
        Ok(id)
    }

    fn transition(&mut self, next: AuctionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        self.state = next;
    }

    fn ensure_live(&self) -> Result<(), SessionClosedError> {
        if self.state.is_terminal() {
            return Err(SessionClosedError);
        }
        Ok(())
    }

    fn reset_book(&mut self) {
        tracing::trace!(market = %self.market, discarded = self.book.len(), "book reset");
        self.book.reset();
        self.quote.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Side, TraderId};
    use crate::engine::{
        KPricing, McAfeeClearing, NPricing, NoQueueClearing, NullPricing, QuoteBeating,
        StandardClearing, UniformPricing,
    };
    use crate::errors::{NullPricingError, RejectionReason};
    use crate::interfaces::ChannelObserver;
    use parking_lot::Mutex;
    use rust_decimal::Decimal;

    type Ledger = Arc<Mutex<Vec<Settlement>>>;

    fn ledger() -> (Ledger, Box<dyn SettlementHandler>) {
        let ledger: Ledger = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&ledger);
        let handler: Box<dyn SettlementHandler> =
            Box::new(move |settlement: &Settlement| sink.lock().push(settlement.clone()));
        (ledger, handler)
    }

    fn half() -> Box<dyn PricingPolicy> {
        Box::new(KPricing::new(Decimal::new(5, 1)).unwrap())
    }

    fn auctioneer(mode: ClearingMode) -> Auctioneer {
        Auctioneer::new("WIDGETS", mode, half(), Box::new(StandardClearing::default()))
    }

    fn bid(price: i64, quantity: u32) -> Order {
        Order::bid(Decimal::from(price), quantity, TraderId::new(1))
    }

    fn ask(price: i64, quantity: u32) -> Order {
        Order::ask(Decimal::from(price), quantity, TraderId::new(2))
    }

    #[test]
    fn test_continuous_simple_cross() {
        let (ledger, handler) = ledger();
        let mut auction = auctioneer(ClearingMode::Continuous).with_settlement_handler(handler);

        let bid_id = auction.submit(bid(100, 1)).unwrap();
        let ask_id = auction.submit(ask(80, 1)).unwrap();

        let settlements = ledger.lock();
        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].price, Decimal::from(90));
        assert_eq!(settlements[0].quantity, 1);
        assert_eq!((settlements[0].bid, settlements[0].ask), (bid_id, ask_id));
        assert!(auction.book().is_empty());
        assert_eq!(auction.state(), AuctionState::Open);
    }

    #[test]
    fn test_periodic_orders_wait_for_clear() {
        let mut auction = auctioneer(ClearingMode::Periodic);

        auction.submit(bid(100, 1)).unwrap();
        auction.submit(ask(80, 1)).unwrap();
        assert_eq!(auction.book().len(), 2);
        assert_eq!(auction.book().matched_volume(), 1);

        let settlements = auction.clear().unwrap();
        assert_eq!(settlements.len(), 1);
        assert!(auction.book().is_empty());
    }

    #[test]
    fn test_no_cross_quote() {
        let mut auction = auctioneer(ClearingMode::Periodic);

        auction.submit(bid(50, 1)).unwrap();
        auction.submit(ask(80, 1)).unwrap();

        assert_eq!(
            auction.quote(),
            MarketQuote::new(Some(Decimal::from(50)), Some(Decimal::from(80)))
        );
        assert!(auction.clear().unwrap().is_empty());
        assert_eq!(auction.book().len(), 2);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut auction = auctioneer(ClearingMode::Periodic);

        assert_eq!(auction.submit(bid(10, 1)).unwrap(), OrderId::new(1));
        assert_eq!(
            auction.submit_with_id(bid(11, 1), OrderId::new(10)).unwrap(),
            OrderId::new(10)
        );
        assert_eq!(auction.submit(bid(12, 1)).unwrap(), OrderId::new(11));

        let order = auction.book().get(OrderId::new(11)).unwrap();
        assert_eq!(order.submitted_at(), 3);
    }

    #[test]
    fn test_caller_ids_do_not_reorder_arrival() {
        let mut auction = auctioneer(ClearingMode::Periodic);
        auction.submit(ask(50, 1)).unwrap();

        let first = auction.submit_with_id(bid(60, 1), OrderId::new(100)).unwrap();
        let second = auction.submit_with_id(bid(60, 1), OrderId::new(5)).unwrap();

        assert_eq!(auction.book().matched_quantity(first), 1);
        assert_eq!(auction.book().matched_quantity(second), 0);
        assert_eq!(auction.quote().bid, Some(Decimal::from(60)));
    }

    #[test]
    fn test_exhausted_ids() {
        let mut auction = auctioneer(ClearingMode::Periodic);
        auction
            .submit_with_id(bid(10, 1), OrderId::new(u64::MAX))
            .unwrap();

        assert_eq!(auction.submit(bid(11, 1)), Err(SubmitError::IdsExhausted));
        assert_eq!(auction.book().len(), 1);

        // Caller-allocated ids remain usable
        assert_eq!(
            auction.submit_with_id(bid(12, 1), OrderId::new(3)),
            Ok(OrderId::new(3))
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut auction = auctioneer(ClearingMode::Periodic);
        auction.submit_with_id(bid(10, 1), OrderId::new(7)).unwrap();

        let result = auction.submit_with_id(ask(90, 1), OrderId::new(7));
        assert!(matches!(result, Err(SubmitError::Duplicate(_))));
        assert_eq!(auction.book().len(), 1);
    }

    #[test]
    fn test_malformed_orders_rejected() {
        let mut auction = auctioneer(ClearingMode::Periodic);

        assert_eq!(
            auction.submit(bid(0, 1)),
            Err(SubmitError::Malformed(MalformedOrderError::NonPositivePrice(
                Decimal::ZERO
            )))
        );
        assert_eq!(
            auction.submit(bid(10, 0)),
            Err(SubmitError::Malformed(MalformedOrderError::ZeroQuantity))
        );

        let mut prefilled = bid(10, 2);
        prefilled.fill(1);
        assert_eq!(
            auction.submit(prefilled),
            Err(SubmitError::Malformed(MalformedOrderError::AlreadyFilled {
                filled: 1
            }))
        );
        assert!(auction.book().is_empty());
    }

    #[test]
    fn test_quote_beating_rejection() {
        let (observer, events) = ChannelObserver::bounded(16);
        let mut auction = auctioneer(ClearingMode::Periodic)
            .with_acceptance_policy(Box::new(QuoteBeating))
            .with_observer(Arc::new(observer));

        auction.submit(bid(90, 1)).unwrap();
        auction.submit(ask(95, 1)).unwrap();
        assert_eq!(
            auction.quote(),
            MarketQuote::new(Some(Decimal::from(90)), Some(Decimal::from(95)))
        );

        let result = auction.submit(bid(80, 1));
        assert_eq!(
            result,
            Err(SubmitError::Rejected(RejectionReason::QuoteNotImproved {
                side: Side::Bid,
                price: Decimal::from(80),
                quote: Decimal::from(90),
            }))
        );
        assert_eq!(auction.book().len(), 2);

        let rejected = events
            .try_iter()
            .filter(|e| matches!(e, AuctionEvent::OrderRejected { .. }))
            .count();
        assert_eq!(rejected, 1);
    }

    #[test]
    fn test_withdraw() {
        let mut auction = auctioneer(ClearingMode::Periodic);
        let id = auction.submit(bid(100, 2)).unwrap();
        auction.submit(ask(80, 1)).unwrap();

        let order = auction.withdraw(id).unwrap();
        assert_eq!(order.id(), id);
        assert_eq!(auction.book().matched_volume(), 0);
        assert_eq!(auction.quote().bid, None);

        assert!(matches!(
            auction.withdraw(OrderId::new(99)),
            Err(WithdrawError::NotFound(_))
        ));
    }

    #[test]
    fn test_withdraw_after_continuous_fill() {
        let mut auction = auctioneer(ClearingMode::Continuous);
        let id = auction.submit(bid(100, 3)).unwrap();
        auction.submit(ask(80, 1)).unwrap();

        // Partially filled this round
        assert_eq!(auction.withdraw(id), Err(WithdrawError::AlreadyCleared(id)));

        auction.open_round().unwrap();
        let order = auction.withdraw(id).unwrap();
        assert_eq!(order.filled_quantity(), 1);
        assert_eq!(order.remaining_quantity(), 2);
    }

    #[test]
    fn test_continuous_clearing_failure_keeps_order() {
        let mut auction = Auctioneer::new(
            "WIDGETS",
            ClearingMode::Continuous,
            Box::new(NullPricing),
            Box::new(StandardClearing::default()),
        );

        auction.submit(bid(100, 1)).unwrap();
        let result = auction.submit(ask(80, 1));

        assert_eq!(
            result,
            Err(SubmitError::Clearing {
                id: OrderId::new(2),
                source: ClearError::Pricing(NullPricingError),
            })
        );
        assert_eq!(auction.book().len(), 2);
        assert_eq!(auction.state(), AuctionState::Open);

        // The id carried by the error still reaches the resting order
        let withdrawn = auction.withdraw(OrderId::new(2)).unwrap();
        assert_eq!(withdrawn.side(), Side::Ask);
    }

    #[test]
    fn test_periodic_clearing_does_not_track_cleared_orders() {
        let mut auction = auctioneer(ClearingMode::Periodic);
        let id = auction.submit(bid(100, 3)).unwrap();
        auction.submit(ask(80, 1)).unwrap();

        assert_eq!(auction.clear().unwrap().len(), 1);
        assert!(auction.cleared_this_round.is_empty());

        let order = auction.withdraw(id).unwrap();
        assert_eq!(order.remaining_quantity(), 2);
    }

    #[test]
    fn test_uniform_pricing_single_price() {
        let mut auction = Auctioneer::new(
            "WIDGETS",
            ClearingMode::Periodic,
            Box::new(UniformPricing::new(Decimal::new(5, 1)).unwrap()),
            Box::new(StandardClearing::default()),
        );
        auction.submit(bid(100, 1)).unwrap();
        auction.submit(bid(95, 1)).unwrap();
        auction.submit(ask(80, 1)).unwrap();
        auction.submit(ask(85, 1)).unwrap();

        let settlements = auction.clear().unwrap();
        assert_eq!(settlements.len(), 2);
        assert!(settlements.iter().all(|s| s.price == Decimal::from(90)));
    }

    #[test]
    fn test_n_pricing_history_fed_by_clearing() {
        let mut auction = Auctioneer::new(
            "WIDGETS",
            ClearingMode::Periodic,
            Box::new(NPricing::new(1, Decimal::ONE).unwrap()),
            Box::new(StandardClearing::default()),
        );

        auction.submit(bid(90, 1)).unwrap();
        auction.submit(ask(70, 1)).unwrap();
        assert_eq!(auction.clear().unwrap()[0].price, Decimal::from(90));

        // Mean of the last trade, inside [80, 100]
        auction.submit(bid(100, 1)).unwrap();
        auction.submit(ask(80, 1)).unwrap();
        assert_eq!(auction.clear().unwrap()[0].price, Decimal::from(90));

        auction.close_session();
    }

    #[test]
    fn test_mcafee_auction() {
        let mut auction = Auctioneer::new(
            "WIDGETS",
            ClearingMode::Periodic,
            Box::new(NullPricing),
            Box::new(McAfeeClearing::new()),
        );
        auction.submit(ask(40, 1)).unwrap();
        auction.submit(bid(60, 1)).unwrap();
        auction.submit(bid(45, 1)).unwrap();
        auction.submit(ask(55, 1)).unwrap();

        let settlements = auction.clear().unwrap();
        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].price, Decimal::from(50));
    }

    #[test]
    fn test_book_persistence_round() {
        let mut auction = auctioneer(ClearingMode::Periodic)
            .with_book_persistence(BookPersistence::Round);
        auction.submit(bid(10, 1)).unwrap();

        auction.open_round().unwrap();
        assert!(auction.book().is_empty());
        assert_eq!(auction.round(), 1);
        assert_eq!(auction.quote(), MarketQuote::EMPTY);
    }

    #[test]
    fn test_book_persistence_day() {
        let mut auction = auctioneer(ClearingMode::Periodic)
            .with_book_persistence(BookPersistence::Day);
        auction.submit(bid(10, 1)).unwrap();

        auction.open_round().unwrap();
        assert_eq!(auction.book().len(), 1);

        auction.open_day().unwrap();
        assert!(auction.book().is_empty());
        assert_eq!(auction.day(), 1);
        assert_eq!(auction.round(), 0);
    }

    #[test]
    fn test_no_queue_clearing_empties_book() {
        let mut auction = Auctioneer::new(
            "WIDGETS",
            ClearingMode::Periodic,
            half(),
            Box::new(NoQueueClearing::default()),
        );
        auction.submit(bid(100, 1)).unwrap();
        auction.submit(ask(80, 1)).unwrap();
        auction.submit(bid(20, 4)).unwrap();

        assert_eq!(auction.clear().unwrap().len(), 1);
        assert!(auction.book().is_empty());
    }

    #[test]
    fn test_close_session() {
        let (observer, events) = ChannelObserver::bounded(16);
        let mut auction = auctioneer(ClearingMode::Periodic).with_observer(Arc::new(observer));
        let session = auction.session_id();
        auction.submit(bid(10, 1)).unwrap();
        auction.submit(ask(20, 1)).unwrap();

        let discarded = auction.close_session();
        assert_eq!(discarded.len(), 2);
        assert_eq!(auction.state(), AuctionState::Closed);

        assert_eq!(
            auction.submit(bid(10, 1)),
            Err(SubmitError::NotOpen(AuctionState::Closed))
        );
        assert_eq!(
            auction.withdraw(OrderId::new(1)),
            Err(WithdrawError::NotOpen(AuctionState::Closed))
        );
        assert_eq!(auction.clear(), Ok(Vec::new()));
        assert_eq!(auction.open_round(), Err(SessionClosedError));
        assert!(auction.close_session().is_empty());

        let events: Vec<AuctionEvent> = events.try_iter().collect();
        assert!(events.iter().all(|e| e.session() == session));
        assert!(matches!(
            events.last(),
            Some(AuctionEvent::SessionClosed { discarded: 2, .. })
        ));
    }

    #[test]
    fn test_lifecycle_events() {
        let (observer, events) = ChannelObserver::bounded(16);
        let mut auction = auctioneer(ClearingMode::Periodic).with_observer(Arc::new(observer));

        auction.open_day().unwrap();
        auction.open_round().unwrap();
        let id = auction.submit(bid(100, 1)).unwrap();
        auction.withdraw(id).unwrap();
        auction.clear().unwrap();

        let kinds: Vec<&str> = events.try_iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                "day_opened",
                "round_opened",
                "order_accepted",
                "order_withdrawn",
                "round_cleared"
            ]
        );
    }
}
