// ============================================================================
// Settlement Handler Interface
// Receives every executed transaction for funds and goods transfer
// ============================================================================

use crate::domain::Settlement;

/// Ledger collaborator. Called once per settlement, in clearing order.
pub trait SettlementHandler: Send {
    fn on_settlement(&mut self, settlement: &Settlement);
}

impl<F> SettlementHandler for F
where
    F: FnMut(&Settlement) + Send,
{
    fn on_settlement(&mut self, settlement: &Settlement) {
        self(settlement)
    }
}

/// Settlement handler that ignores every settlement
pub struct NoOpSettlementHandler;

impl SettlementHandler for NoOpSettlementHandler {
    fn on_settlement(&mut self, _settlement: &Settlement) {}
}
