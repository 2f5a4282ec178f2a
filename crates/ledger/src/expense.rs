//! Shared trip expenses.
//!
//! An [`Expense`] is owned by the store; the ledger only reads it. One person
//! (the payer) fronts the whole amount and the participants share it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{ExpenseDefect, ExpenseId, MoneyCents, ParticipantId, TripId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub trip_id: TripId,
    pub title: String,
    pub amount: MoneyCents,
    pub payer: ParticipantId,
    /// Who shares the cost. Empty means the payer is not reimbursed by anyone.
    pub participants: BTreeSet<ParticipantId>,
    pub notes: Option<String>,
}

impl Expense {
    pub fn new(
        id: ExpenseId,
        trip_id: TripId,
        title: &str,
        amount: MoneyCents,
        payer: ParticipantId,
    ) -> Self {
        Self {
            id,
            trip_id,
            title: title.trim().to_string(),
            amount,
            payer,
            participants: BTreeSet::new(),
            notes: None,
        }
    }

    /// Replaces the participant set.
    #[must_use]
    pub fn split_between<I>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        self.participants = participants.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.trim())
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);
        self
    }

    /// Returns `true` if the payer also shares the cost.
    #[must_use]
    pub fn payer_participates(&self) -> bool {
        self.participants.contains(&self.payer)
    }

    /// Checks the expense can be accounted for in `trip_id`.
    ///
    /// With a `roster`, payer and participants must be trip members. Without
    /// one, membership is assumed to be enforced upstream.
    pub fn validate(
        &self,
        trip_id: TripId,
        roster: Option<&BTreeSet<ParticipantId>>,
    ) -> Result<(), ExpenseDefect> {
        if self.trip_id != trip_id {
            return Err(ExpenseDefect::ForeignTrip {
                expected: trip_id,
                actual: self.trip_id,
            });
        }
        if !self.amount.is_positive() {
            return Err(ExpenseDefect::NonPositiveAmount(self.amount));
        }
        if self.title.trim().is_empty() {
            return Err(ExpenseDefect::EmptyTitle);
        }
        if let Some(roster) = roster {
            if !roster.contains(&self.payer) {
                return Err(ExpenseDefect::UnknownPayer(self.payer));
            }
            if let Some(stranger) = self.participants.iter().find(|p| !roster.contains(p)) {
                return Err(ExpenseDefect::UnknownParticipant(*stranger));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dinner() -> Expense {
        Expense::new(
            ExpenseId(1),
            TripId(7),
            " Dinner ",
            MoneyCents::new(9000),
            ParticipantId(1),
        )
        .split_between([1, 2, 3].map(ParticipantId))
    }

    #[test]
    fn new_trims_title_and_collects_participants() {
        let expense = dinner().with_notes("   ");
        assert_eq!(expense.title, "Dinner");
        assert_eq!(expense.participants.len(), 3);
        assert!(expense.payer_participates());
        assert_eq!(expense.notes, None);
    }

    #[test]
    fn validate_rejects_non_positive_amount() {
        let mut expense = dinner();
        expense.amount = MoneyCents::ZERO;
        assert_eq!(
            expense.validate(TripId(7), None),
            Err(ExpenseDefect::NonPositiveAmount(MoneyCents::ZERO))
        );
    }

    #[test]
    fn validate_rejects_blank_title_and_foreign_trip() {
        let mut expense = dinner();
        expense.title = "  ".to_string();
        assert_eq!(
            expense.validate(TripId(7), None),
            Err(ExpenseDefect::EmptyTitle)
        );
        assert_eq!(
            dinner().validate(TripId(8), None),
            Err(ExpenseDefect::ForeignTrip {
                expected: TripId(8),
                actual: TripId(7),
            })
        );
    }

    #[test]
    fn validate_checks_roster_membership() {
        let roster: BTreeSet<ParticipantId> = [1, 2].map(ParticipantId).into();
        assert_eq!(
            dinner().validate(TripId(7), Some(&roster)),
            Err(ExpenseDefect::UnknownParticipant(ParticipantId(3)))
        );

        let outsider = Expense::new(
            ExpenseId(2),
            TripId(7),
            "Taxi",
            MoneyCents::new(100),
            ParticipantId(9),
        )
        .split_between([ParticipantId(1)]);
        assert_eq!(
            outsider.validate(TripId(7), Some(&roster)),
            Err(ExpenseDefect::UnknownPayer(ParticipantId(9)))
        );
        assert!(dinner().validate(TripId(7), None).is_ok());
    }
}
