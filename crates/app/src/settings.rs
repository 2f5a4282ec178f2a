//! Settings for `tripledger`.
//!
//! Sources, later ones winning: the TOML file (`config/tripledger.toml` unless
//! `--config` says otherwise, optional), `TRIPLEDGER_*` environment variables,
//! then command line flags.
use ledger::{Ledger, RemainderPolicy, ValidationPolicy};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tripledger";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level for the `tracing` filter.
    pub level: String,
    pub format: OutputFormat,
    pub remainder: RemainderPolicy,
    pub validation: ValidationPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: OutputFormat::default(),
            remainder: RemainderPolicy::default(),
            validation: ValidationPolicy::default(),
        }
    }
}

/// Values given on the command line; `None` keeps the configured value.
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<String>,
    pub level: Option<String>,
    pub format: Option<OutputFormat>,
    pub remainder: Option<RemainderPolicy>,
    pub skip_invalid: bool,
}

impl Settings {
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let config_path = overrides.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let settings: Settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(overrides.config.is_some()))
            .add_source(config::Environment::with_prefix("TRIPLEDGER"))
            .build()?
            .try_deserialize()?;
        Ok(settings.apply(overrides))
    }

    fn apply(mut self, overrides: &Overrides) -> Self {
        if let Some(level) = &overrides.level {
            self.level = level.clone();
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(remainder) = overrides.remainder {
            self.remainder = remainder;
        }
        if overrides.skip_invalid {
            self.validation = ValidationPolicy::SkipAndReport;
        }
        self
    }

    /// A ledger configured with these settings, restricted to `roster` when
    /// the store listed trip members.
    pub fn ledger(&self, roster: Vec<ledger::ParticipantId>) -> Ledger {
        let builder = Ledger::builder()
            .remainder(self.remainder)
            .validation(self.validation);
        if roster.is_empty() {
            builder.build()
        } else {
            builder.roster(roster).build()
        }
    }
}

#[cfg(test)]
mod tests {
    use ledger::ParticipantId;

    use super::*;

    #[test]
    fn command_line_wins_over_configured_values() {
        let configured = Settings {
            level: "warn".to_string(),
            format: OutputFormat::Csv,
            remainder: RemainderPolicy::Truncate,
            validation: ValidationPolicy::RejectBatch,
        };
        let overrides = Overrides {
            format: Some(OutputFormat::Text),
            remainder: Some(RemainderPolicy::DistributeByIdentity),
            skip_invalid: true,
            ..Overrides::default()
        };

        let settings = configured.apply(&overrides);
        assert_eq!(settings.level, "warn");
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.remainder, RemainderPolicy::DistributeByIdentity);
        assert_eq!(settings.validation, ValidationPolicy::SkipAndReport);
    }

    #[test]
    fn empty_roster_builds_unrestricted_ledger() {
        let ledger = Settings::default().ledger(Vec::new());
        assert_eq!(ledger.remainder_policy(), RemainderPolicy::PayerAbsorbs);
        assert_eq!(ledger.validation_policy(), ValidationPolicy::RejectBatch);
    }

    #[test]
    fn ledger_follows_configured_policies() {
        let settings = Settings {
            remainder: RemainderPolicy::DistributeByIdentity,
            validation: ValidationPolicy::SkipAndReport,
            ..Settings::default()
        };
        let ledger = settings.ledger(vec![ParticipantId(1)]);
        assert_eq!(ledger.remainder_policy(), RemainderPolicy::DistributeByIdentity);
        assert_eq!(ledger.validation_policy(), ValidationPolicy::SkipAndReport);
    }
}
