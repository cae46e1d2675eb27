use std::sync::Arc;

use axum::http::HeaderValue;
use hashfs_resolve::{Dispatcher, DispatcherConfig};
use hashfs_store::{BlobStore, ObjectCodec};
use hashfs_types::ContentHash;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// Serves one default root out of a blob store.
pub struct HashfsServer {
    config: ServerConfig,
    state: AppState,
}

impl HashfsServer {
    pub fn new(config: ServerConfig, store: Arc<dyn BlobStore>, default_root: ContentHash) -> Self {
        let dispatcher = Dispatcher::new(
            ObjectCodec::new(store),
            DispatcherConfig::new(default_root).with_descent(config.descent),
        );
        let name = HeaderValue::from_str(&config.name).unwrap_or_else(|_| {
            tracing::warn!(name = %config.name, "server name is not a valid header value");
            HeaderValue::from_static("hashfs")
        });
        Self {
            config,
            state: AppState { dispatcher, name },
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn default_root(&self) -> ContentHash {
        self.state.dispatcher.config().default_root
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            name = %self.config.name,
            addr = %self.config.bind_addr,
            root = %self.default_root(),
            descent = %self.config.descent,
            "hashfs server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashfs_store::InMemoryBlobStore;

    fn server(config: ServerConfig) -> HashfsServer {
        HashfsServer::new(
            config,
            Arc::new(InMemoryBlobStore::new()),
            ContentHash::from_bytes(b"root"),
        )
    }

    #[test]
    fn server_construction() {
        let server = server(ServerConfig::default());
        assert_eq!(server.config().bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(server.default_root(), ContentHash::from_bytes(b"root"));
    }

    #[test]
    fn invalid_name_falls_back() {
        let config = ServerConfig {
            name: "bad\nname".into(),
            ..ServerConfig::default()
        };
        assert_eq!(server(config).state.name, "hashfs");
    }

    #[tokio::test]
    async fn router_builds() {
        let _router = server(ServerConfig::default()).router();
    }
}
