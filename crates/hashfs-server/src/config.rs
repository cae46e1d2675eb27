use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use hashfs_resolve::DescentPolicy;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_NAME: &str = "serve";
pub const DEFAULT_STORE_ROOT: &str = ".hashfs";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Identifies this listener in logs and in the `server` response header.
    pub name: String,
    /// Directory of the on-disk blob store.
    pub store_root: PathBuf,
    pub descent: DescentPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            name: DEFAULT_NAME.to_string(),
            store_root: PathBuf::from(DEFAULT_STORE_ROOT),
            descent: DescentPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Load a config from a TOML file. Missing keys take their defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Keep the bind address's IP and replace its port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_addr.set_port(port);
        self
    }
}
