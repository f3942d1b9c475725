//! Error types for rule repository access and envelope rendering

use thiserror::Error;

/// Failures that can occur while answering a tool call
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing, or present but unreadable (permissions, not UTF-8)
    #[error("document unreadable: {path}: {source}")]
    DocumentNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("document is not valid JSON: {path}: {source}")]
    DocumentMalformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing required field '{field}' in {document}")]
    MissingRequiredField { document: String, field: String },

    #[error("failed to serialize response: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl GatewayError {
    pub fn missing(document: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            document: document.into(),
            field: field.into(),
        }
    }

    /// Stable failure-kind label written into error envelopes
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DocumentNotFound { .. } => "DocumentNotFound",
            Self::DocumentMalformed { .. } => "DocumentMalformed",
            Self::MissingRequiredField { .. } => "MissingRequiredField",
            Self::Serialization(_) => "SerializationFailure",
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
