//! Request resolution for hashfs.
//!
//! Given request text, discovers a root hash, walks the stored tree down the
//! residual path, and maps whatever it lands on to a transport-neutral
//! [`Response`]: a redirect for symlinks, a blob reference for files, or a
//! JSON/HTML listing for directories.

pub mod dispatch;
pub mod error;
pub mod listing;
pub mod message;
pub mod resolver;
pub mod target;

pub use dispatch::{Dispatcher, DispatcherConfig, SELECTED_FILE};
pub use error::{ResolveError, ResolveResult};
pub use listing::{render_html, render_json, JSON_SUFFIX};
pub use message::{Request, Response};
pub use resolver::{DescentPolicy, Resolution, Resolver};
pub use target::{RequestTarget, RootSource};
