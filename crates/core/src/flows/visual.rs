//! Visual explanation flow.
//!
//! Two strategies are available. `GeneratedImage` issues a text call and an
//! image call concurrently and substitutes a deterministic placeholder image
//! when the image half fails. `InlineSvg` asks for the explanation and an SVG
//! diagram in one structured call and embeds the diagram as a `data:` URL.

use crate::error::GenerationFailure;
use crate::invoker::{FlowInvoker, InvokeOptions};
use crate::models::{VisualExplanationRequest, VisualExplanationResult, VisualSvgDraft};
use crate::{prompts, svg};
use tracing::{info, warn};

const PLACEHOLDER_BASE_URL: &str = "https://picsum.photos/seed";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisualMode {
    /// One structured call returning an explanation and an SVG document.
    #[default]
    InlineSvg,
    /// A text call and an image generation call run side by side.
    GeneratedImage,
}

pub async fn generate_visual_explanation(
    invoker: &FlowInvoker,
    mode: VisualMode,
    request: &VisualExplanationRequest,
) -> Result<VisualExplanationResult, GenerationFailure> {
    info!(concept = %request.concept, ?mode, "Generating visual explanation");
    match mode {
        VisualMode::InlineSvg => with_inline_svg(invoker, request).await,
        VisualMode::GeneratedImage => with_generated_image(invoker, request).await,
    }
}

async fn with_generated_image(
    invoker: &FlowInvoker,
    request: &VisualExplanationRequest,
) -> Result<VisualExplanationResult, GenerationFailure> {
    let image = async {
        match invoker
            .image("visual_image", prompts::visual_image(request))
            .await
        {
            Ok(Some(image)) => (image.url, false),
            Ok(None) => {
                warn!("Image generation returned no media; using placeholder.");
                (placeholder_url(&request.concept), true)
            }
            Err(e) => {
                warn!(error = %e, "Image generation failed; using placeholder.");
                (placeholder_url(&request.concept), true)
            }
        }
    };
    let text = invoker.text(
        "visual_text",
        prompts::visual_text(request),
        InvokeOptions::default(),
    );

    // Both calls live inside this future; dropping it cancels whichever is
    // still in flight.
    let ((image_url, is_placeholder), explanation) = tokio::join!(image, text);

    Ok(VisualExplanationResult {
        explanation: explanation?,
        image_url,
        is_placeholder: Some(is_placeholder),
    })
}

async fn with_inline_svg(
    invoker: &FlowInvoker,
    request: &VisualExplanationRequest,
) -> Result<VisualExplanationResult, GenerationFailure> {
    let draft: VisualSvgDraft = invoker
        .structured(
            "visual_svg",
            prompts::visual_svg(request),
            InvokeOptions::default(),
        )
        .await?;

    let document = svg::validate(&draft.svg_diagram)
        .map_err(|e| GenerationFailure::Contract(format!("svgDiagram is unusable: {}", e)))?;

    Ok(VisualExplanationResult {
        explanation: draft.explanation,
        image_url: svg::to_data_url(document),
        is_placeholder: Some(false),
    })
}

/// Sum of the concept's UTF-16 code units.
fn placeholder_seed(concept: &str) -> u64 {
    concept.encode_utf16().map(u64::from).sum()
}

/// A stock image URL that depends only on `concept`.
pub fn placeholder_url(concept: &str) -> String {
    format!(
        "{}/{}/1024/576",
        PLACEHOLDER_BASE_URL,
        placeholder_seed(concept)
    )
}
