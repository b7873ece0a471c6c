// ============================================================================
// Auction Observer Interface
// Defines the contract for observing auction lifecycle events
// ============================================================================

use crate::domain::{OrderId, Settlement, Side, TraderId};
use crate::errors::RejectionReason;
use crate::numeric::{Price, Quantity};
use chrono::{DateTime, Utc};
use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the auctioneer.
///
/// Timestamps are wall-clock and only meant for reporting; matching results
/// never depend on them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AuctionEvent {
    /// Order passed validation and acceptance and entered the book
    OrderAccepted {
        session: Uuid,
        order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
        timestamp: DateTime<Utc>,
    },

    /// Order refused by an acceptance policy
    OrderRejected {
        session: Uuid,
        owner: TraderId,
        side: Side,
        price: Price,
        reason: RejectionReason,
        timestamp: DateTime<Utc>,
    },

    /// Order withdrawn by its owner
    OrderWithdrawn {
        session: Uuid,
        order_id: OrderId,
        timestamp: DateTime<Utc>,
    },

    RoundOpened {
        session: Uuid,
        day: u64,
        round: u64,
        timestamp: DateTime<Utc>,
    },

    DayOpened {
        session: Uuid,
        day: u64,
        timestamp: DateTime<Utc>,
    },

    /// A clearing pass finished; `settlements` may be empty
    RoundCleared {
        session: Uuid,
        round: u64,
        settlements: Vec<Settlement>,
        timestamp: DateTime<Utc>,
    },

    /// Session closed; `discarded` orders were still resting
    SessionClosed {
        session: Uuid,
        discarded: usize,
        timestamp: DateTime<Utc>,
    },
}

impl AuctionEvent {
    pub fn session(&self) -> Uuid {
        match self {
            AuctionEvent::OrderAccepted { session, .. }
            | AuctionEvent::OrderRejected { session, .. }
            | AuctionEvent::OrderWithdrawn { session, .. }
            | AuctionEvent::RoundOpened { session, .. }
            | AuctionEvent::DayOpened { session, .. }
            | AuctionEvent::RoundCleared { session, .. }
            | AuctionEvent::SessionClosed { session, .. } => *session,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            AuctionEvent::OrderAccepted { timestamp, .. }
            | AuctionEvent::OrderRejected { timestamp, .. }
            | AuctionEvent::OrderWithdrawn { timestamp, .. }
            | AuctionEvent::RoundOpened { timestamp, .. }
            | AuctionEvent::DayOpened { timestamp, .. }
            | AuctionEvent::RoundCleared { timestamp, .. }
            | AuctionEvent::SessionClosed { timestamp, .. } => *timestamp,
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            AuctionEvent::OrderAccepted { .. } => "order_accepted",
            AuctionEvent::OrderRejected { .. } => "order_rejected",
            AuctionEvent::OrderWithdrawn { .. } => "order_withdrawn",
            AuctionEvent::RoundOpened { .. } => "round_opened",
            AuctionEvent::DayOpened { .. } => "day_opened",
            AuctionEvent::RoundCleared { .. } => "round_cleared",
            AuctionEvent::SessionClosed { .. } => "session_closed",
        }
    }
}

/// Observer trait for auction events.
/// Implementations can handle logging, reporting, statistics, etc.
/// `on_event` must not block the auctioneer.
pub trait AuctionObserver: Send + Sync {
    /// Handle an auction event
    fn on_event(&self, event: AuctionEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<AuctionEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op observer for testing
pub struct NoOpObserver;

impl AuctionObserver for NoOpObserver {
    fn on_event(&self, _event: AuctionEvent) {
        // Do nothing
    }
}

/// Logging observer
pub struct LoggingObserver;

impl AuctionObserver for LoggingObserver {
    fn on_event(&self, event: AuctionEvent) {
        tracing::debug!(kind = event.kind(), "Auction event: {:?}", event);
    }
}

/// Forwards events into a bounded crossbeam channel. Events are dropped
/// when the channel is full or the receiver is gone.
#[derive(Clone)]
pub struct ChannelObserver {
    sender: Sender<AuctionEvent>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<AuctionEvent>) -> Self {
        Self { sender }
    }

    /// Create an observer together with the receiving end of its channel
    pub fn bounded(capacity: usize) -> (Self, Receiver<AuctionEvent>) {
        let (sender, receiver) = channel::bounded(capacity);
        (Self::new(sender), receiver)
    }
}

impl AuctionObserver for ChannelObserver {
    fn on_event(&self, event: AuctionEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::trace!(kind = event.kind(), "observer channel full, event dropped");
            }
            Err(TrySendError::Disconnected(event)) => {
                tracing::trace!(kind = event.kind(), "observer channel closed, event dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn withdrawn(session: Uuid, id: u64) -> AuctionEvent {
        AuctionEvent::OrderWithdrawn {
            session,
            order_id: OrderId::new(id),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_noop_observer() {
        let observer = NoOpObserver;
        observer.on_event(withdrawn(Uuid::new_v4(), 1));
        // Should not panic
    }

    #[test]
    fn test_event_accessors() {
        let session = Uuid::new_v4();
        let event = withdrawn(session, 3);

        assert_eq!(event.session(), session);
        assert_eq!(event.kind(), "order_withdrawn");
        assert!(event.timestamp() <= Utc::now());
    }

    #[test]
    fn test_channel_observer_drops_when_full() {
        let session = Uuid::new_v4();
        let (observer, receiver) = ChannelObserver::bounded(2);

        observer.on_events(vec![
            withdrawn(session, 1),
            withdrawn(session, 2),
            withdrawn(session, 3),
        ]);

        let received: Vec<AuctionEvent> = receiver.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert!(matches!(
            received[1],
            AuctionEvent::OrderWithdrawn { order_id, .. } if order_id == OrderId::new(2)
        ));
    }

    #[test]
    fn test_channel_observer_survives_disconnect() {
        let (observer, receiver) = ChannelObserver::bounded(1);
        drop(receiver);

        observer.on_event(withdrawn(Uuid::new_v4(), 1));
    }
}
