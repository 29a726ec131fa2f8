//! Entry point used by the HTTP layer: one method per flow over a shared
//! `FlowInvoker`.

use crate::error::GenerationFailure;
use crate::flows::{self, VisualMode};
use crate::grading::{self, QuizGrade, QuizGradeRequest};
use crate::invoker::FlowInvoker;
use crate::models::{
    CodeGenRequest, CodeGenResult, ConceptExplanationRequest, ConceptExplanationResult,
    LearningPathRequest, LearningPathResult, QuizRequest, QuizResult, VisualExplanationRequest,
    VisualExplanationResult,
};

pub struct Tutor {
    invoker: FlowInvoker,
    visual_mode: VisualMode,
}

impl Tutor {
    pub fn new(invoker: FlowInvoker, visual_mode: VisualMode) -> Self {
        Self {
            invoker,
            visual_mode,
        }
    }

    pub async fn learning_path(
        &self,
        request: &LearningPathRequest,
    ) -> Result<LearningPathResult, GenerationFailure> {
        flows::generate_learning_path(&self.invoker, request).await
    }

    pub async fn explain_concept(
        &self,
        request: &ConceptExplanationRequest,
    ) -> Result<ConceptExplanationResult, GenerationFailure> {
        flows::explain_concept(&self.invoker, request).await
    }

    pub async fn adaptive_quiz(
        &self,
        request: &QuizRequest,
    ) -> Result<QuizResult, GenerationFailure> {
        flows::generate_adaptive_quiz(&self.invoker, request).await
    }

    pub fn grade_quiz(&self, request: &QuizGradeRequest) -> QuizGrade {
        grading::grade(&request.quiz, &request.answers)
    }

    pub async fn code_snippet(
        &self,
        request: &CodeGenRequest,
    ) -> Result<CodeGenResult, GenerationFailure> {
        flows::generate_code_snippet(&self.invoker, request).await
    }

    pub async fn visual_explanation(
        &self,
        request: &VisualExplanationRequest,
    ) -> Result<VisualExplanationResult, GenerationFailure> {
        flows::generate_visual_explanation(&self.invoker, self.visual_mode, request).await
    }
}
