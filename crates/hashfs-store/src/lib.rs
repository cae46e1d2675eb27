//! Content-addressed blob storage for hashfs.
//!
//! Every piece of data in hashfs -- raw file bodies and encoded tree objects
//! alike -- is stored as an immutable blob identified by the BLAKE3 hash of
//! its bytes.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- sharded on-disk store
//!
//! [`ObjectCodec`] layers JSON-encoded [`hashfs_types::Object`]s on top of
//! any backend.
//!
//! # Design Rules
//!
//! 1. Blobs are immutable once written (content-addressing guarantees this).
//! 2. Writes are idempotent and commutative, so no ordering is needed
//!    between concurrent writers.
//! 3. The store never interprets blob contents.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod codec;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use codec::ObjectCodec;
pub use error::{StoreError, StoreResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
