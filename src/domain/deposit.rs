use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Amount, Participant};

/// Cumulative deposits per participant. Participants who never deposited
/// have no entry.
pub type DepositLedger = HashMap<Participant, Amount>;

/// One contribution of cash to the shared pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositEvent {
    /// Monotonically increasing sequence number for ordering
    pub sequence: u64,
    pub participant: Participant,
    /// Positive for contributions; negative only for correction entries
    pub amount: Amount,
    pub recorded_at: DateTime<Utc>,
}

impl DepositEvent {
    /// Create a new deposit. Sequence number must be assigned by the store.
    pub fn new(participant: Participant, amount: Amount, recorded_at: DateTime<Utc>) -> Self {
        assert!(amount.is_finite(), "Deposit amount must be finite");
        Self {
            sequence: 0,
            participant,
            amount,
            recorded_at,
        }
    }
}

/// Fold deposit events into running totals per participant.
pub fn cumulative_deposits(events: &[DepositEvent]) -> DepositLedger {
    let mut ledger = DepositLedger::new();
    for event in events {
        *ledger.entry(event.participant.clone()).or_insert(0.0) += event.amount;
    }
    ledger
}

/// Running total for one participant; zero when they never deposited.
pub fn deposited_by(participant: &Participant, deposits: &DepositLedger) -> Amount {
    deposits.get(participant).copied().unwrap_or(0.0)
}
