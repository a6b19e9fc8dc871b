//! HTTP router assembly.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, put},
};
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware, state::AppState};

/// Build the service router.
///
/// `/account/*` routes sit behind the `X-User-Id` check; `/health` is public.
pub fn build_router(state: AppState) -> Router {
    let account_routes = Router::new()
        .route("/account/get", get(handlers::accounts::get_balance))
        .route("/account/deposit", put(handlers::accounts::deposit))
        .route("/account/withdrawal", put(handlers::accounts::withdrawal))
        .route_layer(axum_middleware::from_fn(middleware::auth::require_user_id));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(account_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
