//! Error types for the snapshot crate.

/// Errors that can occur while encoding a single node.
///
/// [`Encoder::encode`](crate::Encoder::encode) absorbs these into error
/// leaves; only the wrapper-building operations surface them.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Reading filesystem metadata or contents failed.
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] hashfs_store::StoreError),

    /// A child encoding task panicked or was cancelled.
    #[error("encode task failed: {0}")]
    Task(String),
}

impl SnapshotError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Convenience alias for snapshot results.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
