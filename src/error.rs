//! Error taxonomy for the analysis pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that end an analysis run in the `Failed` phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Input was empty or whitespace-only.
    #[error("input text is empty")]
    EmptyInput,

    #[error("cannot connect to classification service at {endpoint}")]
    Connect { endpoint: String },

    #[error("classification request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("classification service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed classification response: {0}")]
    MalformedResponse(String),

    #[error("classification request failed: {0}")]
    Transport(String),

    /// The service answered, but outside the declared domain.
    #[error("classification contract violated: {0}")]
    ContractViolation(String),
}

/// Coarse grouping used for presentation and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Service,
    ContractViolation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Service => write!(f, "service"),
            ErrorKind::ContractViolation => write!(f, "contract violation"),
        }
    }
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::EmptyInput => ErrorKind::Validation,
            AnalysisError::ContractViolation(_) => ErrorKind::ContractViolation,
            AnalysisError::Connect { .. }
            | AnalysisError::Timeout { .. }
            | AnalysisError::Status { .. }
            | AnalysisError::MalformedResponse(_)
            | AnalysisError::Transport(_) => ErrorKind::Service,
        }
    }

    /// Message suitable for showing to the person who submitted the text.
    ///
    /// Contract violations are presented the same way as service failures.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Validation => "Please enter some text.".to_string(),
            ErrorKind::Service | ErrorKind::ContractViolation => {
                format!("Error analyzing text: {}", self)
            }
        }
    }
}

/// Failure details exposed by the orchestrator in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub request: u64,
    pub kind: ErrorKind,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(AnalysisError::EmptyInput.kind(), ErrorKind::Validation);
        assert_eq!(
            AnalysisError::Timeout { seconds: 5 }.kind(),
            ErrorKind::Service
        );
        assert_eq!(
            AnalysisError::Status {
                status: 502,
                body: String::new()
            }
            .kind(),
            ErrorKind::Service
        );
        assert_eq!(
            AnalysisError::ContractViolation("probability 140".into()).kind(),
            ErrorKind::ContractViolation
        );
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            AnalysisError::EmptyInput.user_message(),
            "Please enter some text."
        );

        let msg = AnalysisError::Connect {
            endpoint: "http://127.0.0.1:8000".into(),
        }
        .user_message();
        assert!(msg.starts_with("Error analyzing text:"));
        assert!(msg.contains("127.0.0.1:8000"));

        let msg = AnalysisError::ContractViolation("label \"maybe\"".into()).user_message();
        assert!(msg.starts_with("Error analyzing text:"));
    }
}
