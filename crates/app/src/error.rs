use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Ledger(#[from] ledger::LedgerError),
    #[error("expense {expense_id}: {source}")]
    Record {
        expense_id: i64,
        source: ledger::LedgerError,
    },
    #[error("verification failed: {0}")]
    Verification(String),
}
