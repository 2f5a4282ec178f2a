//! Wire types exchanged with the trip store and the presentation layer.
//!
//! Money travels as decimal strings with two fraction digits (`"12.34"`), never
//! as JSON floats.

use serde::{Deserialize, Serialize};

pub mod trip {
    use super::*;

    /// Point-in-time view of one trip as handed over by the store.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TripSnapshot {
        pub trip_id: i64,
        /// Trip members. When non-empty, expenses may only reference them.
        #[serde(default)]
        pub members: Vec<MemberRecord>,
        #[serde(default)]
        pub expenses: Vec<ExpenseRecord>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MemberRecord {
        pub id: i64,
        pub name: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ExpenseRecord {
        pub id: i64,
        pub trip_id: i64,
        pub title: String,
        /// Decimal amount, e.g. `"90.00"`.
        pub amount: String,
        pub payer_id: i64,
        #[serde(default)]
        pub participant_ids: Vec<i64>,
        pub notes: Option<String>,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BalanceView {
        pub user_id: i64,
        pub name: String,
        /// Signed net decimal, unsplit credit included.
        pub balance: String,
        /// Total of the expenses this member paid without sharing them.
        pub unsplit: String,
        /// `balance - unsplit`: what the settlements move. Positive is owed
        /// by the group.
        pub settleable: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SettlementView {
        pub from: i64,
        pub to: i64,
        pub from_name: String,
        pub to_name: String,
        pub amount: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SkippedView {
        pub expense_id: i64,
        pub reason: String,
    }

    /// Everything the expense page of a trip shows.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LedgerReport {
        pub trip_id: i64,
        pub balances: Vec<BalanceView>,
        pub settlements: Vec<SettlementView>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub skipped: Vec<SkippedView>,
    }
}

#[cfg(test)]
mod tests {
    use super::{report::*, trip::*};

    #[test]
    fn snapshot_defaults_missing_lists() {
        let snapshot: TripSnapshot = serde_json::from_str(r#"{"trip_id": 3}"#).unwrap();
        assert_eq!(snapshot.trip_id, 3);
        assert!(snapshot.members.is_empty());
        assert!(snapshot.expenses.is_empty());
    }

    #[test]
    fn expense_record_reads_store_fields() {
        let record: ExpenseRecord = serde_json::from_str(
            r#"{"id": 1, "trip_id": 3, "title": "Hotel", "amount": "90.00",
                "payer_id": 7, "participant_ids": [7, 8], "notes": null}"#,
        )
        .unwrap();
        assert_eq!(record.amount, "90.00");
        assert_eq!(record.participant_ids, vec![7, 8]);
        assert_eq!(record.notes, None);
    }

    #[test]
    fn report_omits_empty_skipped_list() {
        let report = LedgerReport {
            trip_id: 3,
            balances: vec![BalanceView {
                user_id: 7,
                name: "Alice".to_string(),
                balance: "70.00".to_string(),
                unsplit: "40.00".to_string(),
                settleable: "30.00".to_string(),
            }],
            settlements: vec![SettlementView {
                from: 8,
                to: 7,
                from_name: "Bob".to_string(),
                to_name: "Alice".to_string(),
                amount: "30.00".to_string(),
            }],
            skipped: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("skipped").is_none());
        assert_eq!(json["balances"][0]["unsplit"], "40.00");
        assert_eq!(json["balances"][0]["settleable"], "30.00");
        assert_eq!(json["settlements"][0]["from"], 8);
        assert_eq!(json["settlements"][0]["amount"], "30.00");
    }
}
