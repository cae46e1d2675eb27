use hashfs_types::ContentHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{0} is not a valid descriptor")]
    InvalidRoot(ContentHash),

    #[error("no such path segment: {segment}")]
    NotFound { segment: String },

    #[error("object not found: {0}")]
    MissingObject(ContentHash),

    #[error("store error: {0}")]
    Store(#[from] hashfs_store::StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type ResolveResult<T> = Result<T, ResolveError>;
