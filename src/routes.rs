use crate::{
    notice::{self, CreateNoticeRequest, CreateNoticeResponse, NoticeResponse, UpdateNoticeBody},
    pipeline::FieldError,
    response::{ErrorBody, ValidationErrorBody},
    state::AppState,
};
use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        notice::notice_handlers::get_notice,
        notice::notice_handlers::list_notices,
        notice::notice_handlers::create_notice,
        notice::notice_handlers::update_notice,
        notice::notice_handlers::delete_notice,
    ),
    components(
        schemas(
            CreateNoticeRequest,
            UpdateNoticeBody,
            NoticeResponse,
            CreateNoticeResponse,
            FieldError,
            ValidationErrorBody,
            ErrorBody,
        )
    ),
    tags(
        (name = "notices", description = "Notice board endpoints")
    )
)]
pub struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let notice_routes = Router::new()
        .route("/", get(notice::list_notices).post(notice::create_notice))
        .route(
            "/:id",
            get(notice::get_notice)
                .put(notice::update_notice)
                .delete(notice::delete_notice),
        );

    let api_routes = Router::new().nest("/v1/notices", notice_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
