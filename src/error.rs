use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds of a Top-K query.
///
/// Every public operation returns an [anyhow::Error] whose root cause is one of these
/// variants, so callers can tell the kinds apart with `downcast_ref::<TopKError>()`.
/// All of them abort the query, no partial result is ever returned.
#[derive(Debug, Error)]
pub enum TopKError {
    /// The source path does not exist
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The source exists but could not be opened
    #[error("source unreadable: {}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The query parameters are inconsistent
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A read failed in the middle of the stream
    #[error("read failed at byte offset {offset}")]
    IoFailure {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    /// A merge worker failed or panicked
    #[error("merge worker failed: {0}")]
    WorkerFailure(String),
}

impl TopKError {
    pub(crate) fn invalid_configuration(message: impl Into<String>) -> TopKError {
        TopKError::InvalidConfiguration(message.into())
    }
}
