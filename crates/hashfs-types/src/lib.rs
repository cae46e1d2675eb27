//! Foundation types for hashfs.
//!
//! hashfs snapshots a filesystem subtree into an immutable tree of
//! content-addressed objects. This crate holds the vocabulary shared by every
//! other crate in the workspace.
//!
//! # Key Types
//!
//! - [`ContentHash`] -- BLAKE3 digest that addresses every stored object
//! - [`Entry`] -- one node of a snapshot: file, directory, or symlink
//! - [`Wrapper`] -- uniform handle over a directory root or a selected child
//! - [`Object`] -- anything the codec may decode from the store
//! - [`find_hash_token`] -- locate a hash inside request text

pub mod entry;
pub mod error;
pub mod hash;
pub mod token;

pub use entry::{
    DirectoryEntry, Entry, FileEntry, Object, SymlinkEntry, Wrapper, DEFAULT_CONTENT_TYPE,
};
pub use error::TypeError;
pub use hash::{ContentHash, HASH_HEX_LEN, HASH_LEN};
pub use token::{find_hash_token, parse_exact_hash, HashToken};
