mod admin;
pub mod error;
mod middleware;
mod public;

pub use admin::{API_KEY_HEADER, AdminState, build_admin_router};
pub use middleware::REQUEST_ID_HEADER;
pub use public::{HttpState, build_router};

use crate::application::error::ErrorReport;
use crate::application::repos::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

fn db_health_response(result: Result<(), StoreError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
