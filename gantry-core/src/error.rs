//! Error types for gantry-core

use thiserror::Error;

use crate::reconcile::ServiceError;
use crate::resolver::ResolveError;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to read or write a tagged-union document
#[derive(Debug, Error)]
pub enum CodecError {
    /// The payload for a recognised tag does not fit that tag's shape
    #[error("malformed {kind} attributes: {source}")]
    MalformedAttributes {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document as a whole could not be decoded
    #[error("malformed pipeline config document: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    /// A value could not be encoded for submission
    #[error("failed to encode {kind}: {source}")]
    Encode {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Desired document does not satisfy the shape rules
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{path}: name must not be empty")]
    EmptyName { path: String },

    #[error("{path}: type '{kind}' requires {field}")]
    MissingAttributes {
        path: String,
        kind: String,
        field: String,
    },

    #[error("{path}: {field} is set but type is '{kind}'")]
    UnexpectedAttributes {
        path: String,
        kind: String,
        field: String,
    },

    #[error("{path}: exactly one of value or valueFrom must be set")]
    AmbiguousValue { path: String },

    #[error("{path}: valueFrom must name exactly one of configMapKeyRef or secretKeyRef")]
    AmbiguousSource { path: String },
}

/// Errors surfaced by the reconciliation core
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced secret or config value could not be read
    #[error("failed to resolve environment: {0}")]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Update or delete attempted without a previously observed version
    #[error("no version token recorded for pipeline '{0}'; observe it first")]
    MissingVersionToken(String),
}

impl Error {
    /// A version conflict that a fresh observe pass can clear
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Service(ServiceError::Conflict(_)))
    }
}
