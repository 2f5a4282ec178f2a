//! The errors the ledger can return.
//!
//! - [`InvalidExpense`] when an expense cannot take part in the balance
//!   computation (see [`ExpenseDefect`]).
//! - [`UnbalancedLedger`] when balances cannot be settled exactly.
//!
//!  [`InvalidExpense`]: LedgerError::InvalidExpense
//!  [`UnbalancedLedger`]: LedgerError::UnbalancedLedger
use thiserror::Error;

use crate::{ExpenseId, MoneyCents, ParticipantId, TripId};

/// Ledger custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid expense {expense_id}: {defect}")]
    InvalidExpense {
        expense_id: ExpenseId,
        defect: ExpenseDefect,
    },
    #[error("Unbalanced ledger: {residue} cannot be settled")]
    UnbalancedLedger { residue: MoneyCents },
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),
    #[error("Amount overflow: {0}")]
    Overflow(String),
}

/// Why an expense was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpenseDefect {
    #[error("amount must be > 0, got {0}")]
    NonPositiveAmount(MoneyCents),
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("belongs to trip {actual}, expected {expected}")]
    ForeignTrip { expected: TripId, actual: TripId },
    #[error("payer {0} is not a trip member")]
    UnknownPayer(ParticipantId),
    #[error("participant {0} is not a trip member")]
    UnknownParticipant(ParticipantId),
}
