//! Axum Handlers for the REST API
//!
//! Every handler takes the body as raw JSON, validates it with the request's
//! contract, and hands the typed request to the `Tutor`. The `utoipa` doc
//! comments feed the generated OpenAPI document.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};
use tutor_core::{
    GenerationFailure, ValidationError,
    grading::{QuizGrade, QuizGradeRequest},
    models::{
        CodeGenRequest, CodeGenResult, ConceptExplanationRequest, ConceptExplanationResult,
        LearningPathRequest, LearningPathResult, QuizRequest, QuizResult,
        VisualExplanationRequest, VisualExplanationResult,
    },
    schema::InputContract,
};

use crate::{models::ErrorResponse, state::AppState};

pub enum ApiError {
    BadRequest(String),
    InvalidField(ValidationError),
    GenerationFailed(GenerationFailure),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
            }
            ApiError::InvalidField(err) => {
                warn!(field = %err.field, "Rejected request: {}", err);
                let body = ErrorResponse::for_field(err.to_string(), err.field);
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::GenerationFailed(err) => {
                error!("Generation failed: {}", err);
                let message = "The content generator did not produce a usable response.";
                (StatusCode::BAD_GATEWAY, Json(ErrorResponse::new(message))).into_response()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidField(err)
    }
}

impl From<GenerationFailure> for ApiError {
    fn from(err: GenerationFailure) -> Self {
        Self::GenerationFailed(err)
    }
}

/// Runs the request contract over a JSON body.
fn validated<R: InputContract>(body: Result<Json<Value>, JsonRejection>) -> Result<R, ApiError> {
    let Json(raw) = body?;
    Ok(R::validate_input(&raw)?)
}

/// Generate a personalized learning path.
#[utoipa::path(
    post,
    path = "/learning-path",
    request_body = LearningPathRequest,
    responses(
        (status = 200, description = "Learning path generated", body = LearningPathResult),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 502, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn learning_path(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LearningPathResult>, ApiError> {
    let request: LearningPathRequest = validated(body)?;
    Ok(Json(state.tutor.learning_path(&request).await?))
}

/// Explain a machine learning concept, optionally adapting to feedback on a
/// previous explanation.
#[utoipa::path(
    post,
    path = "/concept-explanation",
    request_body = ConceptExplanationRequest,
    responses(
        (status = 200, description = "Explanation generated", body = ConceptExplanationResult),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 502, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn concept_explanation(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ConceptExplanationResult>, ApiError> {
    let request: ConceptExplanationRequest = validated(body)?;
    Ok(Json(state.tutor.explain_concept(&request).await?))
}

/// Generate a quiz adapted to the user's learning history.
#[utoipa::path(
    post,
    path = "/quiz",
    request_body = QuizRequest,
    responses(
        (status = 200, description = "Quiz generated", body = QuizResult),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 502, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn quiz(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<QuizResult>, ApiError> {
    let request: QuizRequest = validated(body)?;
    Ok(Json(state.tutor.adaptive_quiz(&request).await?))
}

/// Score answers against a previously generated quiz.
#[utoipa::path(
    post,
    path = "/quiz/grade",
    request_body = QuizGradeRequest,
    responses(
        (status = 200, description = "Quiz graded", body = QuizGrade),
        (status = 400, description = "Invalid request body", body = ErrorResponse)
    )
)]
pub async fn grade_quiz(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<QuizGrade>, ApiError> {
    let request: QuizGradeRequest = validated(body)?;
    Ok(Json(state.tutor.grade_quiz(&request)))
}

/// Generate a commented Python code snippet for an ML task.
#[utoipa::path(
    post,
    path = "/code-snippet",
    request_body = CodeGenRequest,
    responses(
        (status = 200, description = "Snippet generated", body = CodeGenResult),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 502, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn code_snippet(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CodeGenResult>, ApiError> {
    let request: CodeGenRequest = validated(body)?;
    Ok(Json(state.tutor.code_snippet(&request).await?))
}

/// Explain a concept with an accompanying diagram.
#[utoipa::path(
    post,
    path = "/visual-explanation",
    request_body = VisualExplanationRequest,
    responses(
        (status = 200, description = "Explanation and image generated", body = VisualExplanationResult),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 502, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn visual_explanation(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<VisualExplanationResult>, ApiError> {
    let request: VisualExplanationRequest = validated(body)?;
    Ok(Json(state.tutor.visual_explanation(&request).await?))
}
