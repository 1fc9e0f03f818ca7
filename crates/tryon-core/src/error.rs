use serde_json::{Value, json};
use thiserror::Error;

/// Shown for every failure that has no better user-facing text.
pub const GENERIC_FAILURE: &str = "An unexpected error occurred. Please try again.";
/// Fallback when the remote service rejects a request without saying why.
pub const REMOTE_FAILURE: &str = "Failed to process images";
pub const PARSE_FAILURE: &str = "Failed to parse the response from the server";
pub const FORMAT_FAILURE: &str = "Unexpected response format from the server";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Encoding,
    Transport,
    Remote,
    ResponseFormat,
}

impl FailureKind {
    /// Whether the user can fix this by picking different inputs.
    pub fn needs_new_input(&self) -> bool {
        matches!(self, Self::Validation | Self::Encoding)
    }
}

#[derive(Error, Debug)]
pub enum TryOnError {
    #[error("{0}")]
    Validation(String),

    #[error("failed to read image {name}: {source}")]
    Encoding {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request did not complete: {0}")]
    Transport(String),

    #[error("remote service returned HTTP {status}: {message}")]
    Remote {
        status: u16,
        message: String,
        detail: Value,
    },

    #[error("{message}")]
    ResponseFormat { message: String, detail: Value },
}

impl TryOnError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::Validation,
            Self::Encoding { .. } => FailureKind::Encoding,
            Self::Transport(_) => FailureKind::Transport,
            Self::Remote { .. } => FailureKind::Remote,
            Self::ResponseFormat { .. } => FailureKind::ResponseFormat,
        }
    }

    /// Text that is safe to put in front of the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Encoding { .. } | Self::Transport(_) => GENERIC_FAILURE.to_string(),
            Self::Remote { message, .. } | Self::ResponseFormat { message, .. } => message.clone(),
        }
    }

    /// Raw diagnostics kept for logging, never rendered.
    pub fn detail(&self) -> Option<Value> {
        match self {
            Self::Validation(_) => None,
            Self::Encoding { name, source } => Some(json!({
                "resource": name,
                "error": source.to_string(),
            })),
            Self::Transport(raw) => Some(json!({ "error": raw })),
            Self::Remote { detail, .. } | Self::ResponseFormat { detail, .. } => {
                Some(detail.clone())
            }
        }
    }
}
