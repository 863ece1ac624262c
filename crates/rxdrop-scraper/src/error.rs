use rxdrop_core::ValidationError;
use thiserror::Error;

/// Failures raised around the extraction engine while obtaining a results
/// page. The engine itself never fails; these come from its collaborators.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("results page did not load within {after_secs}s (timeout)")]
    Timeout { after_secs: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("invalid results URL \"{url}\": {reason}")]
    InvalidResultsUrl { url: String, reason: String },

    #[error("results page collaborator failed: {0}")]
    Collaborator(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// User-facing classification of a [`LookupError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Failure,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => f.write_str("timeout"),
            Self::Failure => f.write_str("failure"),
        }
    }
}

impl LookupError {
    /// Classify this error for reporting.
    ///
    /// Collaborators do not share an error vocabulary, so anything whose
    /// message mentions "timeout" is treated as one.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::Http(err) if err.is_timeout() => FailureKind::Timeout,
            other if other.to_string().to_lowercase().contains("timeout") => FailureKind::Timeout,
            _ => FailureKind::Failure,
        }
    }

    /// Whether the request itself was rejected before any page was loaded.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
