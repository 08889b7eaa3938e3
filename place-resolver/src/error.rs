use std::time::Duration;

use thiserror::Error;

/// Failure of the grounding service call itself. A reply that merely fails to
/// decode is not an error; see [`crate::parser::ParsedPlace::Fallback`].
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("location query is empty")]
    EmptyQuery,
    #[error("grounding service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("grounding service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("grounding service returned an unreadable envelope: {0}")]
    InvalidResponse(String),
    #[error("no response text from grounding service")]
    EmptyResponse,
    #[error("grounding service did not answer within {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    MissingVar(&'static str),
    #[error("{var} must be a valid number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}
