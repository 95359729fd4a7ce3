use axum::{
    Router,
    http::Request,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::auth::{self, AppState};
use crate::gateway;

/// All routes of the service. CORS is added by the caller.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/gateway", get(gateway::ws_upgrade))
        .with_state(state)
}

/// Request span with method and path only. The query string is left out
/// because `/gateway?token=` carries a live session token.
pub fn request_span<B>(req: &Request<B>) -> Span {
    tracing::debug_span!("request", method = %req.method(), path = %req.uri().path())
}

/// HTTP request tracing that never records query strings.
pub fn with_tracing(router: Router) -> Router {
    router.layer(TraceLayer::new_for_http().make_span_with(request_span::<axum::body::Body>))
}
