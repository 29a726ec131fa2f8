use crate::error::GenerationFailure;
use crate::invoker::{FlowInvoker, InvokeOptions};
use crate::models::{QuizRequest, QuizResult};
use crate::prompts;
use tracing::{info, warn};

/// Generates a quiz adapted to the learning history.
///
/// Dangerous-content and harassment blocking are relaxed for this call, since
/// questions about adversarial attacks or toxic-text classifiers are ordinary
/// ML material. A quiz whose length differs from the requested one is still
/// returned, but a quiz with no questions, or with a question whose answer is
/// not among its options, is not.
pub async fn generate_adaptive_quiz(
    invoker: &FlowInvoker,
    request: &QuizRequest,
) -> Result<QuizResult, GenerationFailure> {
    info!(length = request.desired_quiz_length, "Generating adaptive quiz");
    let prompt = prompts::adaptive_quiz(request);
    let quiz: QuizResult = invoker
        .structured("adaptive_quiz", prompt, InvokeOptions::permissive())
        .await?;

    if quiz.quiz_questions.is_empty() {
        return Err(GenerationFailure::EmptyResponse);
    }

    if let Some((index, question)) = quiz
        .quiz_questions
        .iter()
        .enumerate()
        .find(|(_, q)| !q.answer_is_an_option())
    {
        return Err(GenerationFailure::Contract(format!(
            "quizQuestions[{}].correctAnswer '{}' is not one of its options",
            index, question.correct_answer
        )));
    }

    let requested = request.desired_quiz_length as usize;
    if quiz.quiz_questions.len() != requested {
        warn!(
            requested,
            received = quiz.quiz_questions.len(),
            "Quiz length differs from the requested length"
        );
    }
    Ok(quiz)
}
