use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("customers must be greater than 0")]
    CustomersZero,
    #[error("{stream} duration must be finite and > 0 (got {value})")]
    InvalidDuration { stream: &'static str, value: f64 },
    #[error("invalid distribution '{0}': expected uniform:low:high or constant:value")]
    InvalidDistributionEntry(String),
    #[error("invalid {name} distribution: {reason}")]
    InvalidDistribution { name: &'static str, reason: String },
    #[error("inconsistent station state: {0}")]
    InconsistentState(String),
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("{0}")]
    Export(String),
    #[error("{0}")]
    Cli(String),
}

pub type Result<T> = std::result::Result<T, Error>;
