//! Net balances of a trip.
//!
//! [`BalanceCalculator`] replays a trip's expenses and produces [`Balances`]:
//! for every referenced participant, how much the group owes them (positive)
//! or how much they owe the group (negative).

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    Expense, ExpenseDefect, ExpenseId, LedgerError, MoneyCents, ParticipantId, RemainderPolicy,
    ResultLedger, TripId, ValidationPolicy,
};

/// An expense left out of the computation under
/// [`ValidationPolicy::SkipAndReport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedExpense {
    pub expense_id: ExpenseId,
    pub defect: ExpenseDefect,
}

/// Signed net amount per participant, ordered by identity.
///
/// Besides the net amount, each participant carries an *unsplit* credit: the
/// total of the expenses they paid without splitting them with anyone. Nobody
/// owes that money, so it is not part of what [`settleable`] returns.
///
/// [`settleable`]: Balances::settleable
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Balances {
    entries: BTreeMap<ParticipantId, MoneyCents>,
    unsplit: BTreeMap<ParticipantId, MoneyCents>,
    skipped: Vec<SkippedExpense>,
}

impl Balances {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Net balance of `participant`, `None` if never referenced.
    #[must_use]
    pub fn get(&self, participant: ParticipantId) -> Option<MoneyCents> {
        self.entries.get(&participant).copied()
    }

    /// Unsplit credit of `participant` (zero when none).
    #[must_use]
    pub fn unsplit(&self, participant: ParticipantId) -> MoneyCents {
        self.unsplit.get(&participant).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, MoneyCents)> + '_ {
        self.entries.iter().map(|(id, amount)| (*id, *amount))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Expenses left out because they were invalid, in input order.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedExpense] {
        &self.skipped
    }

    /// Sum of all net balances.
    pub fn total(&self) -> ResultLedger<MoneyCents> {
        MoneyCents::checked_sum(self.entries.values().copied())
    }

    /// Sum of all unsplit credits.
    pub fn unsplit_total(&self) -> ResultLedger<MoneyCents> {
        MoneyCents::checked_sum(self.unsplit.values().copied())
    }

    /// The part of each balance that settlements must move: net balance minus
    /// unsplit credit.
    pub fn settleable(&self) -> ResultLedger<BTreeMap<ParticipantId, MoneyCents>> {
        self.entries
            .iter()
            .map(|(id, amount)| {
                amount
                    .checked_sub(self.unsplit(*id))
                    .map(|value| (*id, value))
                    .ok_or_else(|| LedgerError::Overflow(format!("settleable balance of {id}")))
            })
            .collect()
    }

    /// `true` when nobody has to pay anybody.
    #[must_use]
    pub fn is_settled_up(&self) -> bool {
        self.entries
            .iter()
            .all(|(id, amount)| *amount == self.unsplit(*id))
    }

    fn touch(&mut self, participant: ParticipantId) {
        self.entries.entry(participant).or_default();
    }

    fn credit(&mut self, participant: ParticipantId, amount: MoneyCents) -> ResultLedger<()> {
        let entry = self.entries.entry(participant).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow(format!("balance of {participant}")))?;
        Ok(())
    }

    fn debit(&mut self, participant: ParticipantId, amount: MoneyCents) -> ResultLedger<()> {
        let entry = self.entries.entry(participant).or_default();
        *entry = entry
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::Overflow(format!("balance of {participant}")))?;
        Ok(())
    }

    fn record_unsplit(&mut self, payer: ParticipantId, amount: MoneyCents) -> ResultLedger<()> {
        let entry = self.unsplit.entry(payer).or_default();
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow(format!("unsplit credit of {payer}")))?;
        Ok(())
    }
}

/// Builds balances directly from `(participant, net)` pairs; later pairs
/// replace earlier ones. Mostly useful to feed the settlement planner with
/// balances computed elsewhere.
impl FromIterator<(ParticipantId, MoneyCents)> for Balances {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, MoneyCents)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

/// Turns an ordered list of expenses into [`Balances`].
#[derive(Clone, Debug, Default)]
pub struct BalanceCalculator {
    remainder: RemainderPolicy,
    validation: ValidationPolicy,
    roster: Option<BTreeSet<ParticipantId>>,
}

impl BalanceCalculator {
    #[must_use]
    pub fn new(remainder: RemainderPolicy, validation: ValidationPolicy) -> Self {
        Self {
            remainder,
            validation,
            roster: None,
        }
    }

    /// Restricts payers and participants to the given trip members.
    #[must_use]
    pub fn with_roster<I>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        self.roster = Some(members.into_iter().collect());
        self
    }

    #[must_use]
    pub fn remainder_policy(&self) -> RemainderPolicy {
        self.remainder
    }

    #[must_use]
    pub fn validation_policy(&self) -> ValidationPolicy {
        self.validation
    }

    /// Computes the net balances of `trip_id` from `expenses`, in input order.
    ///
    /// Under [`ValidationPolicy::RejectBatch`] the first invalid expense aborts
    /// with [`LedgerError::InvalidExpense`]; under
    /// [`ValidationPolicy::SkipAndReport`] it is recorded in
    /// [`Balances::skipped`] and ignored.
    pub fn compute(&self, trip_id: TripId, expenses: &[Expense]) -> ResultLedger<Balances> {
        let mut balances = Balances::new();

        for expense in expenses {
            if let Err(defect) = expense.validate(trip_id, self.roster.as_ref()) {
                match self.validation {
                    ValidationPolicy::RejectBatch => {
                        return Err(LedgerError::InvalidExpense {
                            expense_id: expense.id,
                            defect,
                        });
                    }
                    ValidationPolicy::SkipAndReport => {
                        tracing::warn!(
                            "skipping expense {} of trip {trip_id}: {defect}",
                            expense.id
                        );
                        balances.skipped.push(SkippedExpense {
                            expense_id: expense.id,
                            defect,
                        });
                        continue;
                    }
                }
            }
            self.apply(&mut balances, expense)?;
        }

        tracing::debug!(
            "trip {trip_id}: {} expenses, {} participants, {} skipped",
            expenses.len(),
            balances.len(),
            balances.skipped.len()
        );
        Ok(balances)
    }

    fn apply(&self, balances: &mut Balances, expense: &Expense) -> ResultLedger<()> {
        let payer = expense.payer;
        balances.touch(payer);

        // Nobody shares it: the payer is credited and nobody owes them.
        if expense.participants.is_empty() {
            balances.credit(payer, expense.amount)?;
            return balances.record_unsplit(payer, expense.amount);
        }

        let overflow = || LedgerError::Overflow(format!("shares of expense {}", expense.id));
        let (share, remainder) = expense
            .amount
            .split_floor(expense.participants.len())
            .ok_or_else(overflow)?;
        let extra_units = usize::try_from(remainder.cents()).map_err(|_| overflow())?;

        let mut owed_by_others = MoneyCents::ZERO;
        // Participants iterate in identity order.
        for (idx, participant) in expense.participants.iter().enumerate() {
            let owed = match self.remainder {
                RemainderPolicy::DistributeByIdentity if idx < extra_units => share
                    .checked_add(MoneyCents::new(1))
                    .ok_or_else(overflow)?,
                _ => share,
            };
            if *participant == payer {
                continue;
            }
            balances.debit(*participant, owed)?;
            owed_by_others = owed_by_others.checked_add(owed).ok_or_else(overflow)?;
        }

        let payer_credit = match self.remainder {
            RemainderPolicy::PayerAbsorbs | RemainderPolicy::DistributeByIdentity => owed_by_others,
            RemainderPolicy::Truncate if expense.payer_participates() => {
                expense.amount.checked_sub(share).ok_or_else(overflow)?
            }
            RemainderPolicy::Truncate => expense.amount,
        };
        balances.credit(payer, payer_credit)
    }
}
