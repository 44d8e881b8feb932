use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use super::notice_models::Notice;
use crate::pipeline::{validation::rule_violation, Request};

pub const TITLE_MAX_CHARS: usize = 50;

// Requests

#[derive(Debug, Clone, Validate)]
pub struct GetNoticeRequest {
    #[validate(range(min = 1, message = "id must be greater than zero"))]
    pub id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ListNoticesRequest;

impl Validate for ListNoticesRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateNoticeRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "validate_message"))]
    pub message: String,
}

#[derive(Debug, Clone, Validate)]
pub struct UpdateNoticeRequest {
    #[validate(range(min = 1, message = "id must be greater than zero"))]
    pub id: i64,
    #[validate(custom(function = "validate_message"))]
    pub message: String,
}

/// JSON body of `PUT /notices/{id}`; the id comes from the path.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateNoticeBody {
    #[serde(default)]
    pub message: String,
}

impl UpdateNoticeBody {
    pub fn into_request(self, id: i64) -> UpdateNoticeRequest {
        UpdateNoticeRequest {
            id,
            message: self.message,
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct DeleteNoticeRequest {
    #[validate(range(min = 1, message = "id must be greater than zero"))]
    pub id: i64,
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(rule_violation("title_empty", "title must not be empty"));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(rule_violation(
            "title_too_long",
            "title must not exceed 50 characters",
        ));
    }
    // PostgreSQL text columns cannot store NUL
    if title.contains('\0') {
        return Err(rule_violation("title_nul", "title must not contain NUL characters"));
    }
    Ok(())
}

fn validate_message(message: &str) -> Result<(), ValidationError> {
    if message.trim().is_empty() {
        return Err(rule_violation("message_empty", "message must not be empty"));
    }
    if message.contains('\0') {
        return Err(rule_violation(
            "message_nul",
            "message must not contain NUL characters",
        ));
    }
    Ok(())
}

impl Request for GetNoticeRequest {
    type Response = NoticeResponse;
    const NAME: &'static str = "get_notice";

    fn subject_id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Request for ListNoticesRequest {
    type Response = Vec<NoticeResponse>;
    const NAME: &'static str = "list_notices";
}

impl Request for CreateNoticeRequest {
    type Response = CreateNoticeResponse;
    const NAME: &'static str = "create_notice";
}

impl Request for UpdateNoticeRequest {
    type Response = ();
    const NAME: &'static str = "update_notice";

    fn subject_id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Request for DeleteNoticeRequest {
    type Response = ();
    const NAME: &'static str = "delete_notice";

    fn subject_id(&self) -> Option<i64> {
        Some(self.id)
    }
}

// Responses

/// Full projection returned by the read operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NoticeResponse {
    pub id: i64,
    pub active: bool,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NoticeResponse {
    pub fn from_notice(notice: &Notice) -> Self {
        Self {
            id: notice.id,
            active: notice.active,
            title: notice.title.clone(),
            message: notice.message.clone(),
            created_at: notice.created_at,
            updated_at: notice.updated_at,
        }
    }
}

/// Projection returned after creation. `active` and `updated_at` are left
/// out: a fresh notice is always active and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateNoticeResponse {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl CreateNoticeResponse {
    pub fn from_notice(notice: &Notice) -> Self {
        Self {
            id: notice.id,
            title: notice.title.clone(),
            message: notice.message.clone(),
            created_at: notice.created_at,
        }
    }
}
