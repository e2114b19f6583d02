//! Error types for chain pricing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    /// A precondition was violated (non-positive spot, non-positive strike, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required per-contract field is absent
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// A market-data collaborator failed to supply spot or chain data
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type ChainResult<T> = Result<T, ChainError>;

impl ChainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short machine-friendly tag, used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "InvalidInput",
            Self::MissingInput(_) => "MissingInput",
            Self::UpstreamUnavailable(_) => "UpstreamUnavailable",
            Self::Data(_) => "Data",
            Self::Config(_) => "Config",
            Self::IO(_) => "IO",
            Self::Serialization(_) => "Serialization",
        }
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
