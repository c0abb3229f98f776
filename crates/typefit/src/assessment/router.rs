use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};

use super::domain::AssessmentAnswers;
use super::service::AssessmentService;
use crate::error::AppError;

/// Router builder exposing the question bank and the scoring endpoint.
pub fn assessment_router(service: Arc<AssessmentService>) -> Router {
    Router::new()
        .route("/api/v1/assessments/questions", get(questions_handler))
        .route("/api/v1/assessments/score", post(score_handler))
        .with_state(service)
}

pub(crate) async fn questions_handler(State(service): State<Arc<AssessmentService>>) -> Response {
    (StatusCode::OK, axum::Json(service.questions().clone())).into_response()
}

/// Body rejections (malformed JSON, out-of-range values) are reported as
/// `{"error": ..}` like scoring failures.
pub(crate) async fn score_handler(
    State(service): State<Arc<AssessmentService>>,
    payload: Result<axum::Json<AssessmentAnswers>, JsonRejection>,
) -> Response {
    let axum::Json(answers) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return AppError::from(rejection).into_response(),
    };

    match service.score(&answers) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}
