use thiserror::Error;

/// Recurrence rule errors
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Invalid interval: {0} (must be at least 1)")]
    InvalidInterval(u32),

    #[error("Invalid occurrence count: {0} (must be at least 1)")]
    InvalidCount(u32),

    #[error("Unsupported period: {0}")]
    UnsupportedPeriod(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Recurrence error: {0}")]
    Recurrence(#[from] rrule::RRuleError),

    #[error(transparent)]
    CoreError(#[from] cadence_core::error::CoreError),
}

pub type RuleResult<T> = std::result::Result<T, RuleError>;
