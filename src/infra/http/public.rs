use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::{
    application::schedule::{QueryError, ScheduleService},
    domain::types::Bucket,
};

use super::{
    error::{ApiError, codes},
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub schedule: Arc<ScheduleService>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/schedule/all", get(schedule_all))
        .route("/schedule/previous", get(schedule_previous))
        .route("/schedule/now", get(schedule_now))
        .route("/schedule/upnext", get(schedule_upnext))
        .route("/schedule/when", get(schedule_when))
        .route("/schedule/what", get(schedule_what))
        .route("/_health", get(public_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchQuery {
    title: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TimeQueryParams {
    time: Option<String>,
}

async fn bucket_response(state: &HttpState, bucket: Bucket) -> Response {
    Json(state.schedule.get_bucket(bucket).await).into_response()
}

async fn schedule_all(State(state): State<HttpState>) -> Response {
    bucket_response(&state, Bucket::All).await
}

async fn schedule_previous(State(state): State<HttpState>) -> Response {
    bucket_response(&state, Bucket::Previous).await
}

async fn schedule_now(State(state): State<HttpState>) -> Response {
    bucket_response(&state, Bucket::Now).await
}

async fn schedule_upnext(State(state): State<HttpState>) -> Response {
    bucket_response(&state, Bucket::UpNext).await
}

async fn schedule_when(
    State(state): State<HttpState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    match state
        .schedule
        .search(query.title.as_deref(), query.description.as_deref())
        .await
    {
        Ok(entries) => Json(entries).into_response(),
        Err(QueryError::InvalidArgument(detail)) => ApiError::bad_request(
            codes::MISSING_SEARCH_TERM,
            "Either title or description must be provided",
            Some(detail),
        )
        .into_response(),
    }
}

async fn schedule_what(
    State(state): State<HttpState>,
    Query(query): Query<TimeQueryParams>,
) -> Response {
    let Some(time) = query.time.filter(|value| !value.trim().is_empty()) else {
        return ApiError::bad_request(
            codes::BAD_REQUEST,
            "Query parameter `time` is required",
            None,
        )
        .into_response();
    };

    match state.schedule.lookup_at(&time).await {
        Ok(entries) => Json(entries).into_response(),
        Err(QueryError::InvalidArgument(detail)) => ApiError::bad_request(
            codes::INVALID_TIME,
            "Invalid time format. Use ISO 8601 format",
            Some(detail),
        )
        .into_response(),
    }
}

async fn public_health() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
