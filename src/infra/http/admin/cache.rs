use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::info;

use crate::application::schedule::{CacheStatus, RefreshReport};

use super::super::error::ApiError;
use super::AdminState;

const REFRESHED_MESSAGE: &str = "Cache refreshed successfully";

#[derive(Debug, Serialize)]
struct RefreshResponse {
    message: &'static str,
    #[serde(flatten)]
    report: RefreshReport,
}

pub(super) async fn refresh_cache(State(state): State<AdminState>) -> Response {
    match state.schedule.force_refresh().await {
        Ok(report) => {
            info!(
                target = "chunt_schedule::http::admin",
                entries = report.entries,
                skipped = report.skipped,
                "Cache refreshed on request"
            );
            Json(RefreshResponse {
                message: REFRESHED_MESSAGE,
                report,
            })
            .into_response()
        }
        Err(err) => ApiError::store_unavailable(&err).into_response(),
    }
}

pub(super) async fn cache_status(State(state): State<AdminState>) -> Json<CacheStatus> {
    Json(state.schedule.cache_status())
}
