use thiserror::Error;

/// Errors raised by the indicator engine.
#[derive(Debug, Error)]
pub enum RiskError {
    /// Lookup against the closed indicator set with a key that is not in it.
    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    /// Static configuration that cannot be used (bad direction, duplicate key, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid period length: {0} years")]
    InvalidPeriod(f64),

    #[error("generation window contains no dates")]
    EmptyWindow,

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RiskError>;
