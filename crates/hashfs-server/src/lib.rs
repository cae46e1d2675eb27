//! HTTP server for hashfs.
//!
//! Exposes a blob store over HTTP: every request path is handed to the
//! [`hashfs_resolve::Dispatcher`], and its transport response is turned into
//! an HTTP response, streaming referenced blobs out of the store.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::HashfsServer;
