use axum::Router;

use crate::app_state::SharedState;

pub mod players;
pub mod storage;

/// All API routes, without the tracing and cors layers the server adds.
pub fn api_router() -> Router<SharedState> {
    Router::new()
        .nest("/api/players", players::router())
        .nest("/api/storage", storage::router())
}
