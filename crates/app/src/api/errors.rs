//! Backend API errors.

use std::{io, path::PathBuf};

use bebidas::{
    bonuses::RuleId,
    engine::{SubmissionFailure, bounded},
};
use thiserror::Error;

/// Errors talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("connection error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("server error {status}: {excerpt}")]
    Server {
        /// HTTP status code
        status: u16,

        /// Start of the response body
        excerpt: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The backend reported the request as unsuccessful.
    #[error("request was not successful")]
    Unsuccessful,

    /// A file to upload could not be read.
    #[error("failed to read {}: {source}", path.display())]
    File {
        /// Path of the file
        path: PathBuf,

        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ApiError {
    /// Create a server error, keeping only the start of the response body.
    #[must_use]
    pub fn server(status: u16, body: &str) -> Self {
        Self::Server {
            status,
            excerpt: bounded(body),
        }
    }
}

impl From<ApiError> for SubmissionFailure {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Network(error) => Self::Network(error.to_string()),
            ApiError::Server { status, excerpt } => Self::Server { status, excerpt },
            ApiError::Decode(error) => Self::Unexpected(error.to_string()),
            error @ (ApiError::Unsuccessful | ApiError::File { .. }) => {
                Self::Unexpected(error.to_string())
            }
        }
    }
}

/// Backend records that cannot become domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The rule's `tipo_bonificacion` is not a known rule kind.
    #[error("bonus rule {rule} has unknown type {kind:?}")]
    UnknownRuleType {
        /// Rule id
        rule: RuleId,

        /// Rule kind as sent by the backend
        kind: String,
    },

    /// A field the rule's kind needs is absent.
    #[error("bonus rule {rule} is missing {field}")]
    MissingField {
        /// Rule id
        rule: RuleId,

        /// Wire name of the missing field
        field: &'static str,
    },

    /// A field is present but cannot be parsed.
    #[error("bonus rule {rule} has invalid {field}: {value:?}")]
    InvalidField {
        /// Rule id
        rule: RuleId,

        /// Wire name of the field
        field: &'static str,

        /// Value as sent by the backend
        value: String,
    },
}
