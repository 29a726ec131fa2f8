//! Scores a user's answers against a previously generated quiz.
//!
//! Grading is local: it never calls the remote model.

use crate::error::{Constraint, ValidationError};
use crate::models::QuizResult;
use crate::schema::{Fields, InputContract};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizGradeRequest {
    /// The quiz exactly as it was returned by the quiz endpoint.
    pub quiz: QuizResult,
    /// Chosen option per question, keyed by the question's zero-based index.
    /// Questions without an entry count as unanswered.
    #[schema(example = json!({"0": "A", "2": "C"}))]
    pub answers: BTreeMap<usize, String>,
}

impl InputContract for QuizGradeRequest {
    fn validate_input(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::of(raw)?;
        let quiz = QuizResult::from_fields(&fields.object("quiz")?)?;

        let answers_view = fields.object("answers")?;
        let answers = answers_view
            .text_entries()?
            .into_iter()
            .map(|(key, answer)| {
                key.parse::<usize>()
                    .map(|index| (index, answer))
                    .map_err(|_| {
                        ValidationError::new(
                            answers_view.field(key),
                            Constraint::TypeMismatch {
                                expected: "keyed by a question index",
                            },
                        )
                    })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { quiz, answers })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub your_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizGrade {
    /// Number of correctly answered questions.
    pub score: usize,
    /// Number of questions in the quiz.
    pub total: usize,
    /// One row per question, in quiz order.
    pub review: Vec<QuestionReview>,
}

/// Compares each answer to the question's correct answer. Answers for indices
/// outside the quiz are ignored.
pub fn grade(quiz: &QuizResult, answers: &BTreeMap<usize, String>) -> QuizGrade {
    let review: Vec<QuestionReview> = quiz
        .quiz_questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let your_answer = answers.get(&index).cloned();
            QuestionReview {
                question: question.question.clone(),
                is_correct: your_answer.as_deref() == Some(question.correct_answer.as_str()),
                your_answer,
                correct_answer: question.correct_answer.clone(),
            }
        })
        .collect();

    QuizGrade {
        score: review.iter().filter(|row| row.is_correct).count(),
        total: review.len(),
        review,
    }
}
