// Server module - router assembly shared by the binary and the tests

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::state::AppState;

/// Build the full application router. CORS is layered on by the binary
/// so tests exercise the same routes without it.
pub fn build_router(state: AppState) -> Router {
    let api_router = api::api_router(state);

    Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
}
