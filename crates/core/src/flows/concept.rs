use crate::error::GenerationFailure;
use crate::invoker::{FlowInvoker, InvokeOptions};
use crate::models::{ConceptExplanationRequest, ConceptExplanationResult};
use crate::prompts;
use tracing::info;

/// Explains one concept, adapting to the optional knowledge level and to
/// feedback on a previous explanation.
pub async fn explain_concept(
    invoker: &FlowInvoker,
    request: &ConceptExplanationRequest,
) -> Result<ConceptExplanationResult, GenerationFailure> {
    info!(
        concept = %request.concept,
        with_feedback = request.user_feedback.is_some(),
        "Explaining concept"
    );
    let prompt = prompts::concept_explanation(request);
    invoker
        .structured("concept_explanation", prompt, InvokeOptions::default())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockGenerationBackend;
    use crate::flows::testing::invoker;
    use crate::schema::InputContract;
    use serde_json::json;

    #[tokio::test]
    async fn explains_with_feedback_in_the_prompt() {
        let request = ConceptExplanationRequest::validate_input(&json!({
            "concept": "Backpropagation",
            "userKnowledgeLevel": "intermediate",
            "userFeedback": "too abstract"
        }))
        .unwrap();

        let mut mock = MockGenerationBackend::new();
        mock.expect_generate()
            .withf(|req| {
                req.prompt.contains("Concept: Backpropagation")
                    && req.prompt.contains("User Knowledge Level: intermediate")
                    && req.prompt.contains("User Feedback: too abstract")
                    && req.safety.is_empty()
            })
            .times(1)
            .returning(|_| {
                Ok(r#"{"explanation":"Think of a chain of dominoes falling backwards."}"#.to_string())
            });

        let result = explain_concept(&invoker(mock), &request).await.unwrap();
        assert!(result.explanation.contains("dominoes"));
    }

    #[tokio::test]
    async fn remote_failure_is_surfaced() {
        let request = ConceptExplanationRequest {
            concept: "Dropout".to_string(),
            user_knowledge_level: None,
            user_feedback: None,
        };
        let mut mock = MockGenerationBackend::new();
        mock.expect_generate()
            .withf(|req| !req.prompt.contains("User Feedback"))
            .times(1)
            .returning(|_| Err(GenerationFailure::Remote("quota exceeded".to_string())));

        let err = explain_concept(&invoker(mock), &request).await.unwrap_err();
        assert!(matches!(err, GenerationFailure::Remote(_)));
    }
}
