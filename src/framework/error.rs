//! # Feed Errors
//!
//! One error type is shared by the document codec, the record lifecycle and
//! every [`FeedStore`](crate::framework::FeedStore) implementation, so a caller
//! of `Record::persist` matches on a single enum no matter which layer failed.

/// Result type for record and store operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors raised while mapping records onto feed documents.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FeedError {
    /// A record was opened without a store (spreadsheet) identifier.
    #[error("Missing store identifier")]
    MissingStoreIdentifier,

    /// No collection in the store carries the requested name.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// The dynamic field accessor was called with an unknown shape.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The remote call failed. Carries the transport's message verbatim.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A feed document could not be parsed or serialized.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Configuration could not be loaded.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FeedError {
    /// Returns true if the error came from the remote side.
    pub fn is_transport(&self) -> bool {
        matches!(self, FeedError::Transport(_))
    }
}

impl From<quick_xml::Error> for FeedError {
    fn from(e: quick_xml::Error) -> Self {
        FeedError::MalformedDocument(e.to_string())
    }
}

impl From<serde_yaml::Error> for FeedError {
    fn from(e: serde_yaml::Error) -> Self {
        FeedError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_message() {
        let err = FeedError::Transport("500: backend error".into());
        assert_eq!(err.to_string(), "Transport error: 500: backend error");
        assert!(err.is_transport());

        let err = FeedError::CollectionNotFound("sync log".into());
        assert_eq!(err.to_string(), "Collection not found: sync log");
        assert!(!err.is_transport());
    }
}
