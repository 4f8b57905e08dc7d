// src/tariff/error.rs
use thiserror::Error;

/// Failure of a single source adapter. The router treats every kind the same way.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Request could not complete, or the source answered with a non-2xx status.
    #[error("network failure: {0}")]
    Network(String),
    /// Response did not have the expected shape.
    #[error("parse failure: {0}")]
    Parse(String),
    /// Response was fine but held no matching record.
    #[error("no data: {0}")]
    NoData(String),
}

impl SourceError {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Network(_) => "network",
            SourceError::Parse(_) => "parse",
            SourceError::NoData(_) => "no_data",
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        SourceError::Network(e.to_string())
    }
}
