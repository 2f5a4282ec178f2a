//! Knobs that change how the ledger treats rounding and bad input.

use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// What happens to the minor units left over when an amount does not divide
/// evenly between the participants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemainderPolicy {
    /// Everyone owes the floored share; the payer is credited only what the
    /// others owe and absorbs the leftover.
    #[default]
    PayerAbsorbs,
    /// The first `remainder` participants in identity order owe one extra
    /// minor unit each.
    DistributeByIdentity,
    /// Leftover minor units are dropped and stay on the payer's credit.
    /// Balances then no longer sum to zero and cannot be settled.
    Truncate,
}

impl RemainderPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PayerAbsorbs => "payer-absorbs",
            Self::DistributeByIdentity => "distribute-by-identity",
            Self::Truncate => "truncate",
        }
    }
}

impl TryFrom<&str> for RemainderPolicy {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "payer-absorbs" => Ok(Self::PayerAbsorbs),
            "distribute-by-identity" => Ok(Self::DistributeByIdentity),
            "truncate" => Ok(Self::Truncate),
            other => Err(LedgerError::InvalidPolicy(format!(
                "unknown remainder policy: {other}"
            ))),
        }
    }
}

/// How the balance computation reacts to an invalid expense.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationPolicy {
    /// Fail the whole computation on the first invalid expense.
    #[default]
    RejectBatch,
    /// Leave invalid expenses out and list them next to the balances.
    SkipAndReport,
}

impl ValidationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RejectBatch => "reject-batch",
            Self::SkipAndReport => "skip-and-report",
        }
    }
}

impl TryFrom<&str> for ValidationPolicy {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "reject-batch" => Ok(Self::RejectBatch),
            "skip-and-report" => Ok(Self::SkipAndReport),
            other => Err(LedgerError::InvalidPolicy(format!(
                "unknown validation policy: {other}"
            ))),
        }
    }
}
