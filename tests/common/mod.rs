// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use roomledger::application::LedgerService;
use roomledger::domain::{Amount, Participant, Roster};

/// Tolerance for comparing sums of fractional shares
pub const EPSILON: Amount = 1e-9;

/// Helper to create a service for the three-person household A, B, C
pub fn household() -> LedgerService {
    LedgerService::new(Roster::new(["A", "B", "C"]).unwrap())
}

/// Helper to look up a participant that is known to be on the roster
pub fn member(service: &LedgerService, name: &str) -> Participant {
    service.participant(name).unwrap().clone()
}

pub fn assert_close(actual: Amount, expected: Amount) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

/// Test fixture: a small month of shared spending
pub struct SampleMonth;

impl SampleMonth {
    /// Deposits from everyone plus a handful of uneven splits
    pub fn record(service: &mut LedgerService) {
        service.add_deposit("A", "300").unwrap();
        service.add_deposit("B", "120.50").unwrap();
        service.add_deposit("C", "75").unwrap();

        service
            .add_expense("Biryani", "150", "A", &["A", "B", "C"], Some("Lunch"))
            .unwrap();
        service
            .add_expense("Chai", "10", "B", &["B", "C"], Some("Tea"))
            .unwrap();
        service
            .add_expense("Groceries", "100", "C", &["A", "B", "C"], None)
            .unwrap();
        service
            .add_expense("Paratha", "33.33", "A", &["A"], Some("Breakfast"))
            .unwrap();
    }
}
