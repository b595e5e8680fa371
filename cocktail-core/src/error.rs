use thiserror::Error;

use crate::grid::GridError;

/// Failures of the HTTP transport underneath the recipe lookups.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),
}

/// A raw recipe response that does not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedResponse {
    #[error("Provided api response is malformed: missing keys {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("Provided api response is malformed: {0} has no value")]
    MissingValue(&'static str),
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Could not find a drink with {kind} {query}")]
    NotFound { kind: QueryKind, query: String },

    #[error(transparent)]
    Malformed(#[from] MalformedResponse),

    #[error("Transport error: {0}")]
    Transport(#[from] FetchError),
}

/// Which remote query produced a [`LookupError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Name,
    Ingredient,
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKind::Name => write!(f, "name"),
            QueryKind::Ingredient => write!(f, "ingredient"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to prepare sheet {sheet}: {source}")]
    PrepareSheet {
        sheet: String,
        #[source]
        source: GridError,
    },
}
