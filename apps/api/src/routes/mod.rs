pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    routing::{delete, get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::contact::handlers as contact;
use crate::errors::AppError;
use crate::resume::handlers as resume;
use crate::resume::upload::UPLOAD_BODY_LIMIT;
use crate::state::AppState;

async fn upload_not_found() -> AppError {
    AppError::NotFound("File not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.config.uploads_dir)
        .not_found_service(upload_not_found.into_service());

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/resume/upload",
            post(resume::handle_upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/resume/latest", get(resume::handle_latest))
        .route("/api/resume/download/:id", get(resume::handle_download))
        .route("/api/resume/:id", delete(resume::handle_delete))
        .route("/api/resumes", get(resume::handle_list))
        // Contact API
        .route("/api/contact", post(contact::handle_submit))
        .route("/api/contacts", get(contact::handle_list))
        .nest_service("/uploads", uploads)
        .with_state(state)
}
