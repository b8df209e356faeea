mod auth;
mod cache;
mod health;
mod state;

pub use auth::API_KEY_HEADER;
pub use state::AdminState;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::middleware::{log_responses, set_request_context};

pub fn build_admin_router(state: AdminState) -> Router {
    let protected = Router::new()
        .route("/admin/refresh-cache", post(cache::refresh_cache))
        .route("/admin/cache", get(cache::cache_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin_key,
        ));

    Router::new()
        .merge(protected)
        .route("/admin/health", get(health::admin_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}
