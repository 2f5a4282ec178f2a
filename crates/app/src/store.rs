//! File-backed trip store: reads a [`TripSnapshot`] and maps it onto ledger
//! types.

use std::{collections::HashMap, io::Read, path::Path};

use api_types::trip::{ExpenseRecord, TripSnapshot};
use ledger::{Expense, ExpenseId, MoneyCents, ParticipantId, TripId};

use crate::error::{AppError, Result};

/// Reads a snapshot from `path`, or from stdin when `path` is `-`.
pub fn load_snapshot(path: &Path) -> Result<TripSnapshot> {
    let raw = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };
    let snapshot: TripSnapshot = serde_json::from_str(&raw)?;
    tracing::info!(
        "loaded trip {} with {} expenses and {} members",
        snapshot.trip_id,
        snapshot.expenses.len(),
        snapshot.members.len()
    );
    Ok(snapshot)
}

/// Expenses in store order.
pub fn expenses(snapshot: &TripSnapshot) -> Result<Vec<Expense>> {
    snapshot.expenses.iter().map(expense_from_record).collect()
}

/// Trip members as ledger identities; empty when the store sent none.
pub fn roster(snapshot: &TripSnapshot) -> Vec<ParticipantId> {
    snapshot.members.iter().map(|m| ParticipantId(m.id)).collect()
}

/// Display names by member id.
pub fn member_names(snapshot: &TripSnapshot) -> HashMap<i64, String> {
    snapshot
        .members
        .iter()
        .map(|m| (m.id, m.name.clone()))
        .collect()
}

fn expense_from_record(record: &ExpenseRecord) -> Result<Expense> {
    let amount: MoneyCents = record.amount.parse().map_err(|source| AppError::Record {
        expense_id: record.id,
        source,
    })?;
    let mut expense = Expense::new(
        ExpenseId(record.id),
        TripId(record.trip_id),
        &record.title,
        amount,
        ParticipantId(record.payer_id),
    )
    .split_between(record.participant_ids.iter().copied().map(ParticipantId));
    if let Some(notes) = &record.notes {
        expense = expense.with_notes(notes);
    }
    Ok(expense)
}
