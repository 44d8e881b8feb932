use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::pipeline::{FieldError, Outcome};

/// Body of a 400 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorBody {
    pub errors: Vec<FieldError>,
}

/// Body of a 5xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl<T: Serialize> IntoResponse for Outcome<T> {
    fn into_response(self) -> Response {
        match self {
            Outcome::Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
            Outcome::Created(payload) => (StatusCode::CREATED, Json(payload)).into_response(),
            Outcome::NoContent => StatusCode::NO_CONTENT.into_response(),
            Outcome::NotFound => StatusCode::NOT_FOUND.into_response(),
            Outcome::BadRequest(errors) => {
                (StatusCode::BAD_REQUEST, Json(ValidationErrorBody { errors })).into_response()
            }
            Outcome::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Internal server error".to_string(),
                }),
            )
                .into_response(),
        }
    }
}
