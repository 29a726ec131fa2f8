use crate::error::GenerationFailure;
use crate::invoker::{FlowInvoker, InvokeOptions};
use crate::models::{LearningPathRequest, LearningPathResult};
use crate::prompts;
use tracing::info;

pub async fn generate_learning_path(
    invoker: &FlowInvoker,
    request: &LearningPathRequest,
) -> Result<LearningPathResult, GenerationFailure> {
    info!(learning_style = %request.learning_style, "Generating learning path");
    let prompt = prompts::learning_path(request);
    invoker
        .structured("learning_path", prompt, InvokeOptions::default())
        .await
}
