// ============================================================================
// Shared Auctioneer
// Single-lock handle for hosts that drive one market from several threads
// ============================================================================

use crate::domain::{AuctionState, MarketQuote, Order, OrderId, Settlement};
use crate::engine::Auctioneer;
use crate::errors::{ClearError, SessionClosedError, SubmitError, WithdrawError};
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

/// Cloneable handle to one auctioneer behind one mutex.
///
/// Every call takes the lock for its whole duration, so operations are
/// serialized exactly as on a single thread.
#[derive(Clone)]
pub struct SharedAuctioneer {
    inner: Arc<Mutex<Auctioneer>>,
}

impl SharedAuctioneer {
    pub fn new(auctioneer: Auctioneer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(auctioneer)),
        }
    }

    pub fn submit(&self, order: Order) -> Result<OrderId, SubmitError> {
        self.inner.lock().submit(order)
    }

    pub fn submit_with_id(&self, order: Order, id: OrderId) -> Result<OrderId, SubmitError> {
        self.inner.lock().submit_with_id(order, id)
    }

    pub fn withdraw(&self, id: OrderId) -> Result<Order, WithdrawError> {
        self.inner.lock().withdraw(id)
    }

    pub fn clear(&self) -> Result<Vec<Settlement>, ClearError> {
        self.inner.lock().clear()
    }

    pub fn quote(&self) -> MarketQuote {
        self.inner.lock().quote()
    }

    pub fn open_round(&self) -> Result<(), SessionClosedError> {
        self.inner.lock().open_round()
    }

    pub fn open_day(&self) -> Result<(), SessionClosedError> {
        self.inner.lock().open_day()
    }

    pub fn close_session(&self) -> Vec<Order> {
        self.inner.lock().close_session()
    }

    pub fn state(&self) -> AuctionState {
        self.inner.lock().state()
    }

    pub fn session_id(&self) -> Uuid {
        self.inner.lock().session_id()
    }

    /// Run several operations under one lock acquisition
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut Auctioneer) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl From<Auctioneer> for SharedAuctioneer {
    fn from(auctioneer: Auctioneer) -> Self {
        Self::new(auctioneer)
    }
}
