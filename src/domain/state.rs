// ============================================================================
// Auction State Machine
// ============================================================================

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle of an auctioneer.
///
/// ```text
/// Open --clear()--> Clearing --> Open --> ... --close_session()--> Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AuctionState {
    /// Accepting submissions and withdrawals
    Open,
    /// Processing matched pairs; no submissions accepted
    Clearing,
    /// Terminal
    Closed,
}

impl AuctionState {
    pub fn accepts_orders(&self) -> bool {
        matches!(self, AuctionState::Open)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AuctionState::Closed)
    }

    /// Valid transitions of the state machine
    pub fn can_transition_to(&self, next: AuctionState) -> bool {
        matches!(
            (self, next),
            (AuctionState::Open, AuctionState::Clearing)
                | (AuctionState::Clearing, AuctionState::Open)
                | (AuctionState::Open, AuctionState::Closed)
        )
    }
}

impl fmt::Display for AuctionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuctionState::Open => f.write_str("open"),
            AuctionState::Clearing => f.write_str("clearing"),
            AuctionState::Closed => f.write_str("closed"),
        }
    }
}
