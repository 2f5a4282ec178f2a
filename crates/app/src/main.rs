use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ledger::{RemainderPolicy, TripId, discrepancies};

use crate::{
    error::AppError,
    render::Section,
    settings::{OutputFormat, Overrides, Settings},
};

mod error;
mod render;
mod settings;
mod store;

#[derive(Parser, Debug)]
#[command(name = "tripledger")]
#[command(about = "Balances and settle-up plans for shared trip expenses")]
struct Cli {
    /// Config file (TOML). Defaults to `config/tripledger.toml` when present.
    #[arg(long, env = "TRIPLEDGER_CONFIG")]
    config: Option<String>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Who gets the leftover cents of an uneven split.
    #[arg(long, value_parser = parse_remainder)]
    remainder: Option<RemainderPolicy>,

    /// Skip invalid expenses instead of failing.
    #[arg(long)]
    skip_invalid: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Net balance of every member.
    Balances(SnapshotArgs),
    /// Who pays whom to settle up.
    Settle(SnapshotArgs),
    /// Balances, settlements and skipped expenses.
    Report(SnapshotArgs),
    /// Check that the settle-up plan reproduces the balances exactly.
    Verify(SnapshotArgs),
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// Trip snapshot (JSON), `-` for stdin.
    snapshot: PathBuf,
}

fn parse_remainder(raw: &str) -> Result<RemainderPolicy, String> {
    RemainderPolicy::try_from(raw).map_err(|err| err.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = Settings::load(&Overrides {
        config: cli.config.clone(),
        level: cli.log_level.clone(),
        format: cli.format,
        remainder: cli.remainder,
        skip_invalid: cli.skip_invalid,
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tripledger={level},ledger={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(
        "remainder policy {}, validation policy {}",
        settings.remainder.as_str(),
        settings.validation.as_str()
    );

    let (section, args) = match &cli.command {
        Command::Balances(args) => (Some(Section::Balances), args),
        Command::Settle(args) => (Some(Section::Settlements), args),
        Command::Report(args) => (Some(Section::Full), args),
        Command::Verify(args) => (None, args),
    };

    let snapshot = store::load_snapshot(&args.snapshot)?;
    let expenses = store::expenses(&snapshot)?;
    let ledger = settings.ledger(store::roster(&snapshot));
    let summary = match ledger.summarize(TripId(snapshot.trip_id), &expenses) {
        Ok(summary) => summary,
        Err(err) => {
            tracing::error!("failed to settle trip {}: {err}", snapshot.trip_id);
            return Err(err.into());
        }
    };

    let Some(section) = section else {
        verify(&summary)?;
        println!(
            "trip {}: {} balances, {} settlements, plan is exact",
            snapshot.trip_id,
            summary.balances.len(),
            summary.settlements.len()
        );
        return Ok(());
    };

    let report = render::build_report(&summary, &store::member_names(&snapshot))?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::write_report(&mut out, &report, section, settings.format)?;
    Ok(())
}

fn verify(summary: &ledger::TripSummary) -> Result<(), AppError> {
    let total = summary.balances.total()?;
    let unsplit = summary.balances.unsplit_total()?;
    if total != unsplit {
        return Err(AppError::Verification(format!(
            "balances sum to {total}, expected {unsplit}"
        )));
    }

    let missing = discrepancies(&summary.balances, &summary.settlements)?;
    if let Some((participant, gap)) = missing.first() {
        return Err(AppError::Verification(format!(
            "{} participants not reproduced, first {participant} off by {gap}",
            missing.len()
        )));
    }

    if let Some(loop_payment) = summary.settlements.iter().find(|s| s.from == s.to) {
        return Err(AppError::Verification(format!(
            "{} pays themselves {}",
            loop_payment.from, loop_payment.amount
        )));
    }
    Ok(())
}
