//! Expense ledger and settlement engine for shared trips.
//!
//! The crate is pure: it reads a trip's expenses, computes who is owed what
//! ([`Balances`]) and proposes the payments that square everybody up
//! ([`Settlement`]). Loading expenses and rendering results are left to the
//! caller.
//!
//! ```rust
//! use ledger::{Expense, ExpenseId, Ledger, MoneyCents, ParticipantId, TripId};
//!
//! let (alice, bob, carol) = (ParticipantId(1), ParticipantId(2), ParticipantId(3));
//! let dinner = Expense::new(ExpenseId(1), TripId(1), "Dinner", MoneyCents::new(90_00), alice)
//!     .split_between([alice, bob, carol]);
//!
//! let summary = Ledger::builder().build().summarize(TripId(1), &[dinner]).unwrap();
//! assert_eq!(summary.balances.get(alice), Some(MoneyCents::new(60_00)));
//! assert_eq!(summary.settlements.len(), 2);
//! ```

pub use balances::{BalanceCalculator, Balances, SkippedExpense};
pub use error::{ExpenseDefect, LedgerError};
pub use expense::Expense;
pub use ids::{ExpenseId, ParticipantId, TripId};
pub use money::MoneyCents;
pub use policy::{RemainderPolicy, ValidationPolicy};
pub use settlements::{Settlement, SettlementPlanner, apply_settlements, discrepancies};

mod balances;
mod error;
mod expense;
mod ids;
mod money;
mod policy;
mod settlements;

pub type ResultLedger<T> = Result<T, LedgerError>;

/// Balances and settlements of one trip, computed together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripSummary {
    pub trip_id: TripId,
    pub balances: Balances,
    pub settlements: Vec<Settlement>,
}

/// Balance calculator and settlement planner configured once and reused for
/// every request.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    calculator: BalanceCalculator,
    planner: SettlementPlanner,
}

impl Ledger {
    /// Return a builder for `Ledger`.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// See [`BalanceCalculator::compute`].
    pub fn compute_balances(
        &self,
        trip_id: TripId,
        expenses: &[Expense],
    ) -> ResultLedger<Balances> {
        self.calculator.compute(trip_id, expenses)
    }

    /// See [`SettlementPlanner::plan`].
    pub fn plan_settlements(&self, balances: &Balances) -> ResultLedger<Vec<Settlement>> {
        self.planner.plan(balances)
    }

    /// Computes balances, then the settlements that clear them.
    pub fn summarize(&self, trip_id: TripId, expenses: &[Expense]) -> ResultLedger<TripSummary> {
        let balances = self.compute_balances(trip_id, expenses)?;
        let settlements = self.plan_settlements(&balances)?;
        Ok(TripSummary {
            trip_id,
            balances,
            settlements,
        })
    }

    #[must_use]
    pub fn remainder_policy(&self) -> RemainderPolicy {
        self.calculator.remainder_policy()
    }

    #[must_use]
    pub fn validation_policy(&self) -> ValidationPolicy {
        self.calculator.validation_policy()
    }
}

/// The builder for `Ledger`.
#[derive(Debug, Default)]
pub struct LedgerBuilder {
    remainder: RemainderPolicy,
    validation: ValidationPolicy,
    roster: Option<Vec<ParticipantId>>,
}

impl LedgerBuilder {
    /// How leftover minor units of uneven splits are assigned.
    pub fn remainder(mut self, policy: RemainderPolicy) -> LedgerBuilder {
        self.remainder = policy;
        self
    }

    /// Whether an invalid expense fails the request or is skipped.
    pub fn validation(mut self, policy: ValidationPolicy) -> LedgerBuilder {
        self.validation = policy;
        self
    }

    /// Known trip members. Expenses referencing anybody else are invalid.
    pub fn roster<I>(mut self, members: I) -> LedgerBuilder
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        self.roster = Some(members.into_iter().collect());
        self
    }

    /// Construct `Ledger`.
    pub fn build(self) -> Ledger {
        let mut calculator = BalanceCalculator::new(self.remainder, self.validation);
        if let Some(roster) = self.roster {
            calculator = calculator.with_roster(roster);
        }
        Ledger {
            calculator,
            planner: SettlementPlanner,
        }
    }
}

/// Balances with the default policies.
pub fn compute_balances(trip_id: TripId, expenses: &[Expense]) -> ResultLedger<Balances> {
    BalanceCalculator::default().compute(trip_id, expenses)
}

/// Settlements with the default planner.
pub fn plan_settlements(balances: &Balances) -> ResultLedger<Vec<Settlement>> {
    SettlementPlanner.plan(balances)
}
