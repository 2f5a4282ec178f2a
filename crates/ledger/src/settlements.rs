//! Settling up.
//!
//! [`SettlementPlanner`] turns [`Balances`] into a list of point-to-point
//! payments. Debtors and creditors are matched greedily, largest amounts first,
//! which keeps the number of payments low without searching for the global
//! minimum.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};

use crate::{Balances, LedgerError, MoneyCents, ParticipantId, ResultLedger};

/// One directed payment: `from` pays `amount` to `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settlement {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: MoneyCents,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Plans the payments that clear the settleable part of `balances`.
    ///
    /// Output order is fully determined by the input: amounts descending, ties
    /// by participant identity ascending. At most
    /// `creditors + debtors - 1` payments are produced.
    ///
    /// Fails with [`LedgerError::UnbalancedLedger`] when credits and debts do
    /// not cancel out exactly.
    pub fn plan(&self, balances: &Balances) -> ResultLedger<Vec<Settlement>> {
        let settleable = balances.settleable()?;
        let residue = MoneyCents::checked_sum(settleable.values().copied())?;
        if !residue.is_zero() {
            tracing::error!("refusing to settle: balances are off by {residue}");
            return Err(LedgerError::UnbalancedLedger { residue });
        }

        let mut creditors = Vec::new();
        let mut debtors = Vec::new();
        for (participant, amount) in settleable {
            match amount.cmp(&MoneyCents::ZERO) {
                Ordering::Greater => creditors.push((participant, amount)),
                Ordering::Less => {
                    let owed = MoneyCents::ZERO.checked_sub(amount).ok_or_else(|| {
                        LedgerError::Overflow(format!("debt of {participant}"))
                    })?;
                    debtors.push((participant, owed));
                }
                Ordering::Equal => {}
            }
        }
        largest_first(&mut creditors);
        largest_first(&mut debtors);

        let mut settlements =
            Vec::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));
        let (mut debtor_idx, mut creditor_idx) = (0, 0);
        while debtor_idx < debtors.len() && creditor_idx < creditors.len() {
            let (debtor, owed) = debtors[debtor_idx];
            let (creditor, due) = creditors[creditor_idx];
            let transfer = owed.min(due);

            settlements.push(Settlement {
                from: debtor,
                to: creditor,
                amount: transfer,
            });
            debtors[debtor_idx].1 -= transfer;
            creditors[creditor_idx].1 -= transfer;

            if debtors[debtor_idx].1.is_zero() {
                debtor_idx += 1;
            }
            if creditors[creditor_idx].1.is_zero() {
                creditor_idx += 1;
            }
        }

        let credit_left =
            MoneyCents::checked_sum(creditors[creditor_idx..].iter().map(|(_, due)| *due))?;
        let debt_left =
            MoneyCents::checked_sum(debtors[debtor_idx..].iter().map(|(_, owed)| *owed))?;
        if !credit_left.is_zero() || !debt_left.is_zero() {
            let residue = credit_left
                .checked_sub(debt_left)
                .ok_or_else(|| LedgerError::Overflow("settlement residue".to_string()))?;
            tracing::error!("settlement walk ended with {residue} unmatched");
            return Err(LedgerError::UnbalancedLedger { residue });
        }

        tracing::debug!(
            "planned {} settlements for {} creditors and {} debtors",
            settlements.len(),
            creditors.len(),
            debtors.len()
        );
        Ok(settlements)
    }
}

/// Amount descending, identity ascending on ties.
fn largest_first(entries: &mut [(ParticipantId, MoneyCents)]) {
    entries.sort_by(|(a_id, a_amount), (b_id, b_amount)| {
        b_amount.cmp(a_amount).then_with(|| a_id.cmp(b_id))
    });
}

/// Net position each participant ends up with if `settlements` are read as
/// debts: `from` is debited and `to` credited.
///
/// For a valid plan this equals the settleable balances it was planned from.
pub fn apply_settlements(
    settlements: &[Settlement],
) -> ResultLedger<BTreeMap<ParticipantId, MoneyCents>> {
    let mut ledger: BTreeMap<ParticipantId, MoneyCents> = BTreeMap::new();
    for settlement in settlements {
        let overflow = || LedgerError::Overflow(format!("applying {settlement:?}"));
        let from = ledger.entry(settlement.from).or_default();
        *from = from.checked_sub(settlement.amount).ok_or_else(overflow)?;
        let to = ledger.entry(settlement.to).or_default();
        *to = to.checked_add(settlement.amount).ok_or_else(overflow)?;
    }
    Ok(ledger)
}

/// Participants whose settleable balance is not reproduced by `settlements`,
/// with the amount still missing (expected minus applied). Empty when the plan
/// is exact.
pub fn discrepancies(
    balances: &Balances,
    settlements: &[Settlement],
) -> ResultLedger<Vec<(ParticipantId, MoneyCents)>> {
    let expected = balances.settleable()?;
    let applied = apply_settlements(settlements)?;

    let mut participants: Vec<ParticipantId> =
        expected.keys().chain(applied.keys()).copied().collect();
    participants.sort_unstable();
    participants.dedup();

    let mut missing = Vec::new();
    for participant in participants {
        let want = expected.get(&participant).copied().unwrap_or_default();
        let got = applied.get(&participant).copied().unwrap_or_default();
        let gap = want
            .checked_sub(got)
            .ok_or_else(|| LedgerError::Overflow(format!("discrepancy of {participant}")))?;
        if !gap.is_zero() {
            missing.push((participant, gap));
        }
    }
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(entries: &[(i64, i64)]) -> Balances {
        entries
            .iter()
            .map(|(id, cents)| (ParticipantId(*id), MoneyCents::new(*cents)))
            .collect()
    }

    fn transfer(from: i64, to: i64, cents: i64) -> Settlement {
        Settlement {
            from: ParticipantId(from),
            to: ParticipantId(to),
            amount: MoneyCents::new(cents),
        }
    }

    #[test]
    fn empty_balances_need_no_payment() {
        let plan = SettlementPlanner.plan(&Balances::new()).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn largest_debt_goes_to_largest_credit_first() {
        let input = balances(&[(1, 5000), (2, 2000), (3, -1000), (4, -6000)]);
        let plan = SettlementPlanner.plan(&input).unwrap();

        assert_eq!(
            plan,
            vec![
                transfer(4, 1, 5000),
                transfer(4, 2, 1000),
                transfer(3, 2, 1000),
            ]
        );
        assert!(discrepancies(&input, &plan).unwrap().is_empty());
    }

    #[test]
    fn equal_amounts_are_ordered_by_identity() {
        let input = balances(&[(9, 1000), (3, 1000), (7, -1000), (5, -1000)]);
        let plan = SettlementPlanner.plan(&input).unwrap();

        assert_eq!(plan, vec![transfer(5, 3, 1000), transfer(7, 9, 1000)]);
    }

    #[test]
    fn both_cursors_can_advance_together() {
        let input = balances(&[(1, 300), (2, 200), (3, -300), (4, -200)]);
        let plan = SettlementPlanner.plan(&input).unwrap();

        assert_eq!(plan, vec![transfer(3, 1, 300), transfer(4, 2, 200)]);
    }

    #[test]
    fn zero_balances_are_ignored() {
        let input = balances(&[(1, 0), (2, 150), (3, -150)]);
        let plan = SettlementPlanner.plan(&input).unwrap();

        assert_eq!(plan, vec![transfer(3, 2, 150)]);
    }

    #[test]
    fn residue_is_reported_instead_of_dropped() {
        let input = balances(&[(1, 6667), (2, -3333), (3, -3333)]);
        let err = SettlementPlanner.plan(&input).unwrap_err();

        assert_eq!(
            err,
            LedgerError::UnbalancedLedger {
                residue: MoneyCents::new(1)
            }
        );
    }

    #[test]
    fn apply_settlements_debits_payers_and_credits_payees() {
        let applied = apply_settlements(&[transfer(2, 1, 300), transfer(3, 1, 200)]).unwrap();

        assert_eq!(applied[&ParticipantId(1)], MoneyCents::new(500));
        assert_eq!(applied[&ParticipantId(2)], MoneyCents::new(-300));
        assert_eq!(applied[&ParticipantId(3)], MoneyCents::new(-200));
    }

    #[test]
    fn discrepancies_name_who_is_off() {
        let input = balances(&[(1, 500), (2, -300), (3, -200)]);
        let missing = discrepancies(&input, &[transfer(2, 1, 300)]).unwrap();

        assert_eq!(
            missing,
            vec![
                (ParticipantId(1), MoneyCents::new(200)),
                (ParticipantId(3), MoneyCents::new(-200)),
            ]
        );
    }
}
