//! Turns ledger results into the report the expense page shows, and writes
//! it as JSON, CSV or plain text.

use std::{collections::HashMap, io::Write};

use api_types::report::{BalanceView, LedgerReport, SettlementView, SkippedView};
use ledger::{ParticipantId, TripSummary};

use crate::{error::Result, settings::OutputFormat};

const UNKNOWN_MEMBER: &str = "Unknown";
const ZERO: &str = "0.00";

/// Which parts of the report to print.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Balances,
    Settlements,
    Full,
}

impl Section {
    fn balances(self) -> bool {
        matches!(self, Self::Balances | Self::Full)
    }

    fn settlements(self) -> bool {
        matches!(self, Self::Settlements | Self::Full)
    }
}

/// Builds the report for `summary`.
///
/// Members missing from `names` show as `Unknown` in balances and by their id
/// in settlements.
pub fn build_report(
    summary: &TripSummary,
    names: &HashMap<i64, String>,
) -> Result<LedgerReport> {
    let settlement_name = |id: ParticipantId| {
        names
            .get(&id.get())
            .cloned()
            .unwrap_or_else(|| id.get().to_string())
    };
    let settleable = summary.balances.settleable()?;

    Ok(LedgerReport {
        trip_id: summary.trip_id.get(),
        balances: summary
            .balances
            .iter()
            .map(|(id, balance)| BalanceView {
                user_id: id.get(),
                name: names
                    .get(&id.get())
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_MEMBER.to_string()),
                balance: balance.to_string(),
                unsplit: summary.balances.unsplit(id).to_string(),
                settleable: settleable.get(&id).copied().unwrap_or_default().to_string(),
            })
            .collect(),
        settlements: summary
            .settlements
            .iter()
            .map(|s| SettlementView {
                from: s.from.get(),
                to: s.to.get(),
                from_name: settlement_name(s.from),
                to_name: settlement_name(s.to),
                amount: s.amount.to_string(),
            })
            .collect(),
        skipped: summary
            .balances
            .skipped()
            .iter()
            .map(|skipped| SkippedView {
                expense_id: skipped.expense_id.get(),
                reason: skipped.defect.to_string(),
            })
            .collect(),
    })
}

pub fn write_report<W: Write>(
    out: &mut W,
    report: &LedgerReport,
    section: Section,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, report, section),
        OutputFormat::Csv => write_csv(out, report, section),
        OutputFormat::Text => write_text(out, report, section),
    }
}

fn write_json<W: Write>(out: &mut W, report: &LedgerReport, section: Section) -> Result<()> {
    match section {
        Section::Balances => serde_json::to_writer_pretty(&mut *out, &report.balances)?,
        Section::Settlements => serde_json::to_writer_pretty(&mut *out, &report.settlements)?,
        Section::Full => serde_json::to_writer_pretty(&mut *out, report)?,
    }
    writeln!(out)?;
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, report: &LedgerReport, section: Section) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_writer(&mut *out);

    if section.balances() {
        writer.write_record(["user_id", "name", "balance", "unsplit", "settleable"])?;
        for b in &report.balances {
            writer.write_record([
                b.user_id.to_string().as_str(),
                b.name.as_str(),
                b.balance.as_str(),
                b.unsplit.as_str(),
                b.settleable.as_str(),
            ])?;
        }
    }
    if section.settlements() {
        writer.write_record(["from", "to", "from_name", "to_name", "amount"])?;
        for s in &report.settlements {
            writer.write_record([
                s.from.to_string().as_str(),
                s.to.to_string().as_str(),
                s.from_name.as_str(),
                s.to_name.as_str(),
                s.amount.as_str(),
            ])?;
        }
    }
    if section == Section::Full && !report.skipped.is_empty() {
        writer.write_record(["expense_id", "reason"])?;
        for skipped in &report.skipped {
            writer.write_record([
                skipped.expense_id.to_string().as_str(),
                skipped.reason.as_str(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_text<W: Write>(out: &mut W, report: &LedgerReport, section: Section) -> Result<()> {
    if section.balances() {
        writeln!(out, "Balances for trip {}:", report.trip_id)?;
        for b in &report.balances {
            let status = match b.settleable.strip_prefix('-') {
                Some(owed) => format!("owes {owed}"),
                None if b.settleable == ZERO => "is settled up".to_string(),
                None => format!("is owed {}", b.settleable),
            };
            if b.unsplit == ZERO {
                writeln!(out, "  {} {status}", b.name)?;
            } else {
                writeln!(out, "  {} {status} (paid {} unshared)", b.name, b.unsplit)?;
            }
        }
    }
    if section.settlements() {
        if report.settlements.is_empty() {
            writeln!(out, "Nothing to settle.")?;
        } else {
            writeln!(out, "Settle up:")?;
            for s in &report.settlements {
                writeln!(out, "  {} pays {} {}", s.from_name, s.to_name, s.amount)?;
            }
        }
    }
    if section == Section::Full && !report.skipped.is_empty() {
        writeln!(out, "Skipped expenses:")?;
        for skipped in &report.skipped {
            writeln!(out, "  #{}: {}", skipped.expense_id, skipped.reason)?;
        }
    }
    Ok(())
}
