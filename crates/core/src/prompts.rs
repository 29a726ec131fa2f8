//! Prompt Template Renderer
//!
//! One pure function per flow. The same request always renders the same text,
//! and optional sections are emitted only when their field carries content.

use crate::models::{
    CodeGenRequest, ConceptExplanationRequest, LearningPathRequest, QuizRequest,
    VisualExplanationRequest,
};

const LEARNING_PATH_PREAMBLE: &str = "You are an expert in creating personalized machine learning learning paths.

Based on the user's existing knowledge, learning style, and goals, create a tailored learning path.";

const CONCEPT_PREAMBLE: &str = "You are an expert in Machine Learning and AI.
Your goal is to explain complex ML concepts in a clear and concise manner.";

const QUIZ_PREAMBLE: &str = "You are an expert in machine learning and education. Your task is to generate a quiz that adapts to the user's skill level based on their learning history.";

const QUIZ_INSTRUCTIONS: &str = "Generate a quiz with the specified number of questions. Each question should have multiple choice options, and indicate the correct answer. The correct answer must be copied exactly from the options. Also indicate the ML topic of each question, and the difficulty (easy, medium or hard).

Ensure the quiz is appropriate for the user's level of understanding, focusing on areas where they need the most improvement. Vary the difficulty of questions to assess their knowledge comprehensively.

Output in JSON format:";

const CODE_PREAMBLE: &str = "You are an expert machine learning code generator. Your task is to generate Python code snippets based on user requests.

The code should be well-commented and include explanations of the different steps.";

const CODE_INSTRUCTIONS: &str = "Ensure that the generated code is executable and addresses the user's request directly.
Output only valid and complete Python code snippet.";

const SVG_INSTRUCTIONS: &str = "Return JSON with two fields:
- explanation: a clear and concise explanation of the concept, meant to be read next to the diagram.
- svgDiagram: a complete, self-contained SVG document that illustrates the core idea of the concept.

SVG requirements:
- The root element must be <svg> and declare xmlns=\"http://www.w3.org/2000/svg\".
- Include a viewBox attribute.
- Do not reference external stylesheets, fonts, images or scripts.
- Use inline presentation attributes (fill, stroke, font-size) instead of CSS.
- Use a light background, dark foreground, and at least one accent color.
- Flat, 2D, infographic style with clear labels.";

pub fn learning_path(req: &LearningPathRequest) -> String {
    format!(
        "{LEARNING_PATH_PREAMBLE}\n\nExisting Knowledge: {}\nLearning Style: {}\nGoals: {}\n\nLearning Path:",
        req.existing_knowledge, req.learning_style, req.goals
    )
}

/// Knowledge level and feedback blocks are inserted before the closing
/// `Explanation:` cue, knowledge level first, so supplying feedback never
/// changes the text rendered for the earlier fields.
pub fn concept_explanation(req: &ConceptExplanationRequest) -> String {
    let mut prompt = format!("{CONCEPT_PREAMBLE}\n\nConcept: {}\n", req.concept);

    if let Some(level) = present(&req.user_knowledge_level) {
        prompt.push_str(&format!("\nUser Knowledge Level: {}\n", level));
    }
    if let Some(feedback) = present(&req.user_feedback) {
        prompt.push_str(&format!(
            "\nUser Feedback: {}\nBased on this feedback, adjust the explanation to be more clear and understandable.\n",
            feedback
        ));
    }

    prompt.push_str("\nExplanation:");
    prompt
}

pub fn adaptive_quiz(req: &QuizRequest) -> String {
    format!(
        "{QUIZ_PREAMBLE}\n\nLearning History: {}\nDesired Quiz Length: {}\n\n{QUIZ_INSTRUCTIONS}",
        req.learning_history, req.desired_quiz_length
    )
}

pub fn code_snippet(req: &CodeGenRequest) -> String {
    format!(
        "{CODE_PREAMBLE}\n\nUser Request: {}\n\n{CODE_INSTRUCTIONS}",
        req.task_description
    )
}

/// Text half of the two-call visual flow.
pub fn visual_text(req: &VisualExplanationRequest) -> String {
    format!(
        "Explain the machine learning concept \"{}\" in a clear and concise way. This explanation will be displayed alongside a visual diagram.",
        req.concept
    )
}

/// Image half of the two-call visual flow.
pub fn visual_image(req: &VisualExplanationRequest) -> String {
    format!(
        "Generate a clear, simple, and informative diagram or visual explanation for the following machine learning concept: \"{}\". The image should be easy to understand and suitable for a learning platform. Focus on illustrating the core idea of the concept. Style: Flat, 2D, infographic style with clear labels.",
        req.concept
    )
}

/// Single-call visual flow producing explanation and inline SVG together.
pub fn visual_svg(req: &VisualExplanationRequest) -> String {
    format!(
        "You are an expert machine learning educator and information designer.\n\nConcept: {}\n\n{SVG_INSTRUCTIONS}",
        req.concept
    )
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept(level: Option<&str>, feedback: Option<&str>) -> ConceptExplanationRequest {
        ConceptExplanationRequest {
            concept: "Backpropagation".to_string(),
            user_knowledge_level: level.map(str::to_string),
            user_feedback: feedback.map(str::to_string),
        }
    }

    #[test]
    fn concept_prompt_is_deterministic() {
        let req = concept(Some("intermediate"), Some("too abstract"));
        assert_eq!(concept_explanation(&req), concept_explanation(&req));
    }

    #[test]
    fn concept_prompt_omits_absent_sections() {
        let prompt = concept_explanation(&concept(None, None));
        assert!(prompt.contains("Concept: Backpropagation"));
        assert!(!prompt.contains("User Knowledge Level"));
        assert!(!prompt.contains("User Feedback"));
        assert!(!prompt.contains("\n\n\n"));
        assert!(prompt.ends_with("\n\nExplanation:"));
    }

    #[test]
    fn blank_optional_fields_render_like_absent_ones() {
        assert_eq!(
            concept_explanation(&concept(Some("  "), Some(""))),
            concept_explanation(&concept(None, None))
        );
    }

    #[test]
    fn feedback_only_appends_a_block() {
        let without = concept_explanation(&concept(Some("beginner"), None));
        let with = concept_explanation(&concept(Some("beginner"), Some("use an analogy")));

        let head = without.strip_suffix("Explanation:").unwrap();
        assert!(with.starts_with(head));
        assert!(with.ends_with("Explanation:"));

        let added = &with[head.len()..with.len() - "Explanation:".len()];
        assert!(added.starts_with("User Feedback: use an analogy\n"));
        assert!(added.contains("adjust the explanation"));
    }

    #[test]
    fn learning_path_prompt_embeds_all_fields() {
        let prompt = learning_path(&LearningPathRequest {
            existing_knowledge: "beginner".to_string(),
            learning_style: "visual".to_string(),
            goals: "understand neural nets".to_string(),
        });
        assert!(prompt.contains("Existing Knowledge: beginner\n"));
        assert!(prompt.contains("Learning Style: visual\n"));
        assert!(prompt.contains("Goals: understand neural nets\n"));
        assert!(prompt.ends_with("Learning Path:"));
    }

    #[test]
    fn quiz_and_code_prompts_carry_fixed_instructions() {
        let quiz = adaptive_quiz(&QuizRequest {
            learning_history: "studied regression".to_string(),
            desired_quiz_length: 3,
        });
        assert!(quiz.contains("Desired Quiz Length: 3"));
        assert!(quiz.ends_with("Output in JSON format:"));

        let code = code_snippet(&CodeGenRequest {
            task_description: "k-means on random points".to_string(),
        });
        assert!(code.contains("User Request: k-means on random points"));
        assert!(code.contains("Python"));
    }

    #[test]
    fn svg_prompt_states_document_constraints() {
        let prompt = visual_svg(&VisualExplanationRequest {
            concept: "Dropout".to_string(),
        });
        assert!(prompt.contains("xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(prompt.contains("viewBox"));
    }
}
