use axum::{
    extract::{Path, State},
    Json,
};

use super::notice_dto::{
    CreateNoticeRequest, CreateNoticeResponse, DeleteNoticeRequest, GetNoticeRequest,
    ListNoticesRequest, NoticeResponse, UpdateNoticeBody,
};
use crate::{
    error::Result,
    pipeline::Outcome,
    state::AppState,
};

/// Get a notice by id, active or not
#[utoipa::path(
    get,
    path = "/api/v1/notices/{id}",
    params(("id" = i64, Path, description = "Notice id")),
    responses(
        (status = 200, description = "Notice found", body = NoticeResponse),
        (status = 400, description = "Invalid id", body = crate::response::ValidationErrorBody),
        (status = 404, description = "Notice not found"),
        (status = 500, description = "Internal server error", body = crate::response::ErrorBody)
    ),
    tag = "notices"
)]
pub async fn get_notice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Outcome<NoticeResponse>> {
    state.send(GetNoticeRequest { id }).await
}

/// List all active notices
#[utoipa::path(
    get,
    path = "/api/v1/notices",
    responses(
        (status = 200, description = "Active notices", body = Vec<NoticeResponse>),
        (status = 204, description = "No active notices"),
        (status = 500, description = "Internal server error", body = crate::response::ErrorBody)
    ),
    tag = "notices"
)]
pub async fn list_notices(State(state): State<AppState>) -> Result<Outcome<Vec<NoticeResponse>>> {
    state.send(ListNoticesRequest).await
}

/// Create a notice
#[utoipa::path(
    post,
    path = "/api/v1/notices",
    request_body = CreateNoticeRequest,
    responses(
        (status = 201, description = "Notice created", body = CreateNoticeResponse),
        (status = 400, description = "Invalid input", body = crate::response::ValidationErrorBody),
        (status = 500, description = "Internal server error", body = crate::response::ErrorBody)
    ),
    tag = "notices"
)]
pub async fn create_notice(
    State(state): State<AppState>,
    Json(payload): Json<CreateNoticeRequest>,
) -> Result<Outcome<CreateNoticeResponse>> {
    state.send(payload).await
}

/// Replace the message of a notice
#[utoipa::path(
    put,
    path = "/api/v1/notices/{id}",
    params(("id" = i64, Path, description = "Notice id")),
    request_body = UpdateNoticeBody,
    responses(
        (status = 204, description = "Notice updated"),
        (status = 400, description = "Invalid input", body = crate::response::ValidationErrorBody),
        (status = 404, description = "Notice not found"),
        (status = 500, description = "Internal server error", body = crate::response::ErrorBody)
    ),
    tag = "notices"
)]
pub async fn update_notice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateNoticeBody>,
) -> Result<Outcome<()>> {
    state.send(payload.into_request(id)).await
}

/// Soft-delete a notice
#[utoipa::path(
    delete,
    path = "/api/v1/notices/{id}",
    params(("id" = i64, Path, description = "Notice id")),
    responses(
        (status = 204, description = "Notice deactivated"),
        (status = 400, description = "Invalid id", body = crate::response::ValidationErrorBody),
        (status = 404, description = "Notice not found"),
        (status = 500, description = "Internal server error", body = crate::response::ErrorBody)
    ),
    tag = "notices"
)]
pub async fn delete_notice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Outcome<()>> {
    state.send(DeleteNoticeRequest { id }).await
}
