//! Snapshot encoder for hashfs.
//!
//! Walks a filesystem subtree and stores it as an immutable tree of
//! content-addressed entries. Directory children are encoded concurrently,
//! one task per child, and joined before their parent is built.
//!
//! # Key Types
//!
//! - [`Encoder`] -- encodes paths into entries and wrappers
//! - [`SnapshotError`] -- failures surfaced by wrapper building
//! - [`content_type_for`] -- extension-based MIME detection

pub mod encoder;
pub mod error;
pub mod mime;

pub use encoder::Encoder;
pub use error::{SnapshotError, SnapshotResult};
pub use mime::content_type_for;
