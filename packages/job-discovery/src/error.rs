//! Typed errors for job discovery and application gating.

use thiserror::Error;

use crate::lead::FieldErrors;

/// Result type for job discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Errors surfaced by the catalog client, the listing controllers and the
/// application gate.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Transport failure (connection refused, timeout, TLS)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response. `reason` is the server's stated reason, verbatim.
    #[error("{reason}")]
    Api { status: u16, reason: String },

    /// Response body did not match the expected shape
    #[error("unexpected response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Lead form has invalid fields; nothing was sent
    #[error("lead form is invalid: {0}")]
    Validation(FieldErrors),

    /// Direct application attempted without an auth token
    #[error("sign in to apply for this job")]
    Unauthenticated,

    /// Gate operation not allowed in the current state
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    /// Invalid client configuration
    #[error("config error: {0}")]
    Config(String),
}

impl DiscoveryError {
    /// HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            DiscoveryError::Api { status, .. } => Some(*status),
            DiscoveryError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the error is a business rule rejection the user can act on
    /// (already applied, job closed) rather than a transport problem.
    pub fn is_business(&self) -> bool {
        matches!(self, DiscoveryError::Api { status, .. } if (400..500).contains(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_reason_verbatim() {
        let err = DiscoveryError::Api {
            status: 409,
            reason: "You have already applied for this job".into(),
        };
        assert_eq!(err.to_string(), "You have already applied for this job");
        assert_eq!(err.status(), Some(409));
        assert!(err.is_business());
    }

    #[test]
    fn server_errors_are_not_business_errors() {
        let err = DiscoveryError::Api {
            status: 503,
            reason: "Service Unavailable".into(),
        };
        assert!(!err.is_business());
    }
}
