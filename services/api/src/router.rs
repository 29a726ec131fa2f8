//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the flow endpoints and OpenAPI documentation.

use crate::{handlers, models::ErrorResponse, state::AppState};

use axum::{Router, routing::post};
use std::sync::Arc;
use tutor_core::{
    grading::{QuestionReview, QuizGrade, QuizGradeRequest},
    models::{
        CodeGenRequest, CodeGenResult, ConceptExplanationRequest, ConceptExplanationResult,
        Difficulty, LearningPathRequest, LearningPathResult, QuizQuestion, QuizRequest,
        QuizResult, VisualExplanationRequest, VisualExplanationResult,
    },
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::learning_path,
        handlers::concept_explanation,
        handlers::quiz,
        handlers::grade_quiz,
        handlers::code_snippet,
        handlers::visual_explanation,
    ),
    components(
        schemas(
            LearningPathRequest, LearningPathResult,
            ConceptExplanationRequest, ConceptExplanationResult,
            QuizRequest, QuizResult, QuizQuestion, Difficulty,
            QuizGradeRequest, QuizGrade, QuestionReview,
            CodeGenRequest, CodeGenResult,
            VisualExplanationRequest, VisualExplanationResult,
            ErrorResponse
        )
    ),
    tags(
        (name = "ML Tutor API", description = "Generated learning material for machine learning topics")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/learning-path", post(handlers::learning_path))
        .route("/concept-explanation", post(handlers::concept_explanation))
        .route("/quiz", post(handlers::quiz))
        .route("/quiz/grade", post(handlers::grade_quiz))
        .route("/code-snippet", post(handlers::code_snippet))
        .route("/visual-explanation", post(handlers::visual_explanation))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;
    use tutor_core::{
        FlowInvoker, GenerationFailure, InvokerConfig, Tutor, VisualMode,
        backend::{GeneratedImage, GenerationBackend, GenerationRequest},
    };

    /// Replays canned text responses and counts calls.
    struct FakeBackend {
        replies: Mutex<Vec<Result<String, GenerationFailure>>>,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new(replies: Vec<Result<String, GenerationFailure>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationBackend for FakeBackend {
        async fn generate(&self, _: GenerationRequest) -> Result<String, GenerationFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(GenerationFailure::EmptyResponse);
            }
            replies.remove(0)
        }

        async fn generate_image(
            &self,
            _: String,
        ) -> Result<Option<GeneratedImage>, GenerationFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GenerationFailure::Remote("image model unavailable".to_string()))
        }
    }

    fn app(backend: Arc<FakeBackend>, visual_mode: VisualMode) -> Router {
        let invoker = FlowInvoker::new(backend, InvokerConfig::default());
        create_router(Arc::new(AppState {
            tutor: Arc::new(Tutor::new(invoker, visual_mode)),
        }))
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_learning_path_round_trip() {
        let backend = FakeBackend::new(vec![Ok(
            json!({ "learningPath": "1. Linear algebra\n2. Gradient descent" }).to_string(),
        )]);
        let body = json!({
            "existingKnowledge": "beginner",
            "learningStyle": "visual",
            "goals": "understand neural nets"
        });

        let (status, json) = post_json(
            app(backend.clone(), VisualMode::InlineSvg),
            "/learning-path",
            &body.to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["learningPath"], "1. Linear algebra\n2. Gradient descent");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalid_body_is_rejected_before_generation() {
        let backend = FakeBackend::new(vec![]);
        let (status, json) = post_json(
            app(backend.clone(), VisualMode::InlineSvg),
            "/concept-explanation",
            r#"{"concept": "   "}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["field"], "concept");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_bad_request() {
        let backend = FakeBackend::new(vec![]);
        let (status, json) =
            post_json(app(backend.clone(), VisualMode::InlineSvg), "/quiz", "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].is_string());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_maps_to_bad_gateway() {
        let backend = FakeBackend::new(vec![Err(GenerationFailure::Remote(
            "upstream said no".to_string(),
        ))]);
        let (status, json) = post_json(
            app(backend, VisualMode::InlineSvg),
            "/code-snippet",
            r#"{"taskDescription": "train a logistic regression"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let message = json["message"].as_str().unwrap();
        assert!(!message.contains("upstream said no"));
    }

    #[tokio::test]
    async fn test_quiz_then_grade() {
        let quiz = json!({
            "quizQuestions": [
                { "question": "Q1", "options": ["A", "B"], "correctAnswer": "A", "topic": "regression", "difficulty": "easy" },
                { "question": "Q2", "options": ["A", "B"], "correctAnswer": "B", "topic": "regression", "difficulty": "hard" }
            ]
        });
        let backend = FakeBackend::new(vec![Ok(quiz.to_string())]);
        let router = app(backend.clone(), VisualMode::InlineSvg);

        let (status, generated) = post_json(
            router.clone(),
            "/quiz",
            r#"{"learningHistory": "studied regression", "desiredQuizLength": 2}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(generated["quizQuestions"].as_array().unwrap().len(), 2);

        let grade_body = json!({ "quiz": generated, "answers": { "0": "A", "1": "A" } });
        let (status, grade) = post_json(router, "/quiz/grade", &grade_body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(grade["score"], 1);
        assert_eq!(grade["total"], 2);
        assert_eq!(grade["review"][1]["isCorrect"], false);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_visual_explanation_uses_placeholder_when_image_fails() {
        let backend = FakeBackend::new(vec![Ok("Gradient descent walks downhill.".to_string())]);
        let (status, json) = post_json(
            app(backend, VisualMode::GeneratedImage),
            "/visual-explanation",
            r#"{"concept": "Gradient Descent"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["explanation"], "Gradient descent walks downhill.");
        assert_eq!(json["isPlaceholder"], true);
        assert!(
            json["imageUrl"]
                .as_str()
                .unwrap()
                .starts_with("https://picsum.photos/seed/")
        );
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = app(FakeBackend::new(vec![]), VisualMode::InlineSvg)
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let doc: Value = serde_json::from_slice(&bytes).unwrap();
        for path in [
            "/learning-path",
            "/concept-explanation",
            "/quiz",
            "/quiz/grade",
            "/code-snippet",
            "/visual-explanation",
        ] {
            assert!(doc["paths"][path].is_object(), "missing {}", path);
        }
    }

    #[test]
    fn test_quiz_length_is_optional_in_openapi() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let required: Vec<&str> = doc["components"]["schemas"]["QuizRequest"]["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(required, vec!["learningHistory"]);
    }
}
