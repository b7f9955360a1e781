use axum::{Router, extract::Request, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::{callback_handler, login_handler, root_handler};
use crate::models::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/login", get(login_handler))
        .route("/auth/callback", get(callback_handler))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            // Path only: the callback query string carries the authorization code.
            tracing::debug_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path()
            )
        }))
        .with_state(state)
}
