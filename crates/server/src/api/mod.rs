use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use shared::{
    error::{ApiError, ErrorCode, ErrorResponse},
    protocol::{BoardDocument, ReplaceListsRequest, WriteResult},
};
use tracing::warn;

use crate::app_state::AppState;

pub(crate) type HttpError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn boards_route() -> &'static str {
    "/api/boards"
}

pub(crate) async fn get_board(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BoardDocument>, HttpError> {
    server_api::fetch_board(&state.api)
        .await
        .map(Json)
        .map_err(error_response)
}

pub(crate) async fn replace_board(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReplaceListsRequest>, JsonRejection>,
) -> Result<Json<WriteResult>, HttpError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(status = %rejection.status(), reason = %rejection.body_text(), "rejected board payload");
        error_response(rejection_error(&rejection))
    })?;

    server_api::replace_board(&state.api, &request.lists)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Oversized bodies keep their 413; every other unreadable body is a 400.
fn rejection_error(rejection: &JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::new(ErrorCode::PayloadTooLarge, rejection.body_text())
    } else {
        ApiError::validation(rejection.body_text())
    }
}

pub(crate) fn error_response(err: ApiError) -> HttpError {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::from(&err)))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
