use thiserror::Error;

/// Rejected caller input. Never replaced by a default for fields the goal
/// calculation depends on.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("meal description required")]
    EmptyDescription,

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("{field} must be a positive number")]
    NotPositive { field: &'static str },

    #[error("query must not be empty")]
    EmptyQuery,

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Failure of the external estimation strategy. Stays inside the estimator,
/// which falls back to the deterministic analysis.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("no API key configured")]
    MissingCredentials,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed analysis: {0}")]
    Malformed(String),
}

/// Failure talking to the external food database. Swallowed by the lookup.
#[derive(Debug, Error)]
pub enum FoodLookupError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("food database returned status {0}")]
    Status(u16),
}
