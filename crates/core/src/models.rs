//! Request and result records for every flow.
//!
//! All records are transient: created for one call, returned to the caller,
//! and dropped. Field docs double as the descriptions sent to the model.

use crate::error::{Constraint, ValidationError};
use crate::schema::{Fields, InputContract, OutputContract};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Quiz length used when the caller does not ask for one.
pub const DEFAULT_QUIZ_LENGTH: u32 = 5;

// --- Learning path ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathRequest {
    /// The user's current knowledge and experience in machine learning.
    #[schema(example = "beginner, finished an intro statistics course")]
    pub existing_knowledge: String,
    /// The user's preferred learning style (e.g., visual, auditory, kinesthetic).
    #[schema(example = "visual")]
    pub learning_style: String,
    /// The user's specific learning goals in machine learning.
    #[schema(example = "understand neural nets")]
    pub goals: String,
}

impl InputContract for LearningPathRequest {
    fn validate_input(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            existing_knowledge: fields.required_text("existingKnowledge", 1)?,
            learning_style: fields.required_text("learningStyle", 1)?,
            goals: fields.required_text("goals", 1)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathResult {
    /// A personalized learning path tailored to the user's knowledge, style and goals.
    pub learning_path: String,
}

impl OutputContract for LearningPathResult {
    fn validate_output(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            learning_path: fields.required_text("learningPath", 1)?,
        })
    }
}

// --- Concept explanation ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConceptExplanationRequest {
    /// The ML concept to explain.
    #[schema(example = "Backpropagation")]
    pub concept: String,
    /// The user specified knowledge level of the concept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_knowledge_level: Option<String>,
    /// Feedback from the user to adjust the explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_feedback: Option<String>,
}

impl InputContract for ConceptExplanationRequest {
    fn validate_input(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            concept: fields.required_text("concept", 1)?,
            user_knowledge_level: fields.optional_text("userKnowledgeLevel")?,
            user_feedback: fields.optional_text("userFeedback")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConceptExplanationResult {
    /// The AI-generated explanation of the concept.
    pub explanation: String,
}

impl OutputContract for ConceptExplanationResult {
    fn validate_output(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            explanation: fields.required_text("explanation", 1)?,
        })
    }
}

// --- Adaptive quiz ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    /// A summary of the user learning history, including topics studied, quiz
    /// scores, and areas of difficulty.
    #[schema(example = "studied regression")]
    pub learning_history: String,
    /// The desired number of questions in the quiz.
    #[schema(default = 5, minimum = 1, required = false)]
    pub desired_quiz_length: u32,
}

impl InputContract for QuizRequest {
    fn validate_input(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::of(raw)?;
        let learning_history = fields.required_text("learningHistory", 1)?;
        let length = fields.integer_or("desiredQuizLength", DEFAULT_QUIZ_LENGTH.into(), 1)?;
        let desired_quiz_length = u32::try_from(length).map_err(|_| {
            ValidationError::new(
                "desiredQuizLength",
                Constraint::TypeMismatch {
                    expected: "a 32-bit integer",
                },
            )
        })?;
        Ok(Self {
            learning_history,
            desired_quiz_length,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const NAMES: &'static [&'static str] = &["easy", "medium", "hard"];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// The text of the quiz question.
    pub question: String,
    /// The possible answers to the question.
    pub options: Vec<String>,
    /// The correct answer to the question. Must be copied verbatim from `options`.
    pub correct_answer: String,
    /// The ML topic of the question.
    pub topic: String,
    /// The difficulty of the question.
    pub difficulty: Difficulty,
}

impl QuizQuestion {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, ValidationError> {
        let question = fields.required_text("question", 1)?;
        let options = fields.text_list("options")?;
        let correct_answer = fields.required_text("correctAnswer", 1)?;
        let topic = fields.required_text("topic", 1)?;
        let difficulty = fields.one_of("difficulty", Difficulty::NAMES)?;
        let difficulty = Difficulty::from_name(difficulty).ok_or_else(|| {
            ValidationError::new(
                fields.field("difficulty"),
                Constraint::EnumMismatch {
                    allowed: Difficulty::NAMES,
                },
            )
        })?;
        Ok(Self {
            question,
            options,
            correct_answer,
            topic,
            difficulty,
        })
    }

    /// Whether `correct_answer` is literally one of `options`.
    pub fn answer_is_an_option(&self) -> bool {
        self.options.iter().any(|o| *o == self.correct_answer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    /// An array of quiz questions tailored to the user.
    pub quiz_questions: Vec<QuizQuestion>,
}

impl QuizResult {
    pub(crate) fn from_fields(fields: &Fields<'_>) -> Result<Self, ValidationError> {
        let quiz_questions = fields
            .objects("quizQuestions")?
            .iter()
            .map(QuizQuestion::from_fields)
            .collect::<Result<_, _>>()?;
        Ok(Self { quiz_questions })
    }
}

impl OutputContract for QuizResult {
    fn validate_output(raw: &Value) -> Result<Self, ValidationError> {
        Self::from_fields(&Fields::of(raw)?)
    }
}

// --- Code generation ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeGenRequest {
    /// A detailed description of the machine learning task for which code needs
    /// to be generated.
    #[schema(example = "train a logistic regression classifier on the iris dataset")]
    pub task_description: String,
}

impl InputContract for CodeGenRequest {
    fn validate_input(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            task_description: fields.required_text("taskDescription", 1)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeGenResult {
    /// A Python code snippet that implements the described machine learning
    /// task, including comments and explanations.
    pub code_snippet: String,
}

impl OutputContract for CodeGenResult {
    fn validate_output(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            code_snippet: fields.required_text("codeSnippet", 1)?,
        })
    }
}

// --- Visual explanation ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisualExplanationRequest {
    /// The ML concept to explain visually.
    #[schema(example = "Gradient descent")]
    pub concept: String,
}

impl InputContract for VisualExplanationRequest {
    fn validate_input(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            concept: fields.required_text("concept", 1)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisualExplanationResult {
    /// The AI-generated textual explanation of the concept.
    pub explanation: String,
    /// A remote image URL or a self-contained `data:` URL.
    pub image_url: String,
    /// Whether the image is a placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_placeholder: Option<bool>,
}

impl OutputContract for VisualExplanationResult {
    fn validate_output(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            explanation: fields.required_text("explanation", 1)?,
            image_url: fields.required_text("imageUrl", 1)?,
            is_placeholder: fields.optional_bool("isPlaceholder")?,
        })
    }
}

/// What the single-call SVG variant asks the model for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisualSvgDraft {
    /// A clear, concise textual explanation of the concept, to be shown next
    /// to the diagram.
    pub explanation: String,
    /// A complete, self-contained SVG document. It must declare
    /// xmlns="http://www.w3.org/2000/svg", include a viewBox, use only inline
    /// presentation attributes (no external stylesheets, fonts, or images), and
    /// use a light background with dark foreground and at least one accent color.
    pub svg_diagram: String,
}

impl OutputContract for VisualSvgDraft {
    fn validate_output(raw: &Value) -> Result<Self, ValidationError> {
        let fields = Fields::of(raw)?;
        Ok(Self {
            explanation: fields.required_text("explanation", 1)?,
            svg_diagram: fields.required_text("svgDiagram", 1)?,
        })
    }
}
