//! Remote generation capability.
//!
//! The flows only see the `GenerationBackend` trait; concrete providers are
//! picked once at startup and injected, which also lets tests swap in mocks.

pub mod gemini;
pub mod openai;

use crate::error::GenerationFailure;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

pub use gemini::GeminiClient;
pub use openai::OpenAICompatibleClient;

/// Provider-side content safety category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
}

/// A per-request override of the provider's automatic content rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    /// Dangerous-content and harassment blocking switched off.
    pub fn permissive() -> Vec<SafetySetting> {
        vec![
            SafetySetting {
                category: HarmCategory::DangerousContent,
                threshold: HarmBlockThreshold::BlockNone,
            },
            SafetySetting {
                category: HarmCategory::Harassment,
                threshold: HarmBlockThreshold::BlockNone,
            },
        ]
    }
}

/// Everything one outbound text generation call needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// JSON Schema the response must follow; `None` asks for free text.
    pub response_schema: Option<Value>,
    pub safety: Vec<SafetySetting>,
}

/// Media returned by an image generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// A remote URL or a `data:` URL.
    pub url: String,
}

impl GeneratedImage {
    pub fn from_base64(mime_type: &str, data: &str) -> Self {
        Self {
            url: format!("data:{};base64,{}", mime_type, data),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Performs exactly one outbound call and returns the raw model text.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationFailure>;

    /// Performs exactly one outbound image call. `Ok(None)` means the provider
    /// answered but produced no media.
    async fn generate_image(&self, prompt: String)
    -> Result<Option<GeneratedImage>, GenerationFailure>;
}
