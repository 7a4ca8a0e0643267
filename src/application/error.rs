use thiserror::Error;

use crate::domain::{Amount, ParseAmountError, PatchError, RosterError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid amount: {0}")]
    InvalidAmount(ParseAmountError),

    #[error("Unknown roommate '{name}' (roster: {roster})")]
    UnknownParticipant { name: String, roster: String },

    #[error("Unknown category '{name}' (valid: {valid})")]
    UnknownCategory { name: String, valid: String },

    #[error("Select at least one roommate to share the expense")]
    NoParticipants,

    #[error("Invalid edit: {0}")]
    InvalidPatch(PatchError),

    #[error("Deposits must be positive, got {0}")]
    NegativeDeposit(Amount),

    #[error("Correction for {participant} would leave a negative total ({resulting:.2})")]
    DepositBelowZero {
        participant: String,
        resulting: Amount,
    },

    #[error("Invalid roster: {0}")]
    InvalidRoster(RosterError),

    #[error("Configuration error: {0}")]
    Config(String),
}

// Wrapped errors are rendered inline rather than exposed as a source, so a
// report of the error chain doesn't repeat the same message.

impl From<ParseAmountError> for AppError {
    fn from(e: ParseAmountError) -> Self {
        AppError::InvalidAmount(e)
    }
}

impl From<PatchError> for AppError {
    fn from(e: PatchError) -> Self {
        AppError::InvalidPatch(e)
    }
}

impl From<RosterError> for AppError {
    fn from(e: RosterError) -> Self {
        AppError::InvalidRoster(e)
    }
}
