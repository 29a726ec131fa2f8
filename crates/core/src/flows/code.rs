use crate::error::GenerationFailure;
use crate::invoker::{FlowInvoker, InvokeOptions};
use crate::models::{CodeGenRequest, CodeGenResult};
use crate::prompts;
use tracing::info;

pub async fn generate_code_snippet(
    invoker: &FlowInvoker,
    request: &CodeGenRequest,
) -> Result<CodeGenResult, GenerationFailure> {
    info!("Generating code snippet");
    let prompt = prompts::code_snippet(request);
    invoker
        .structured("code_snippet", prompt, InvokeOptions::default())
        .await
}
