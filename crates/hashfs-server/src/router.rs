use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router. There are no fixed routes: the whole path space
/// belongs to the dispatcher.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(handler::dispatch_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
