//! Native Google Generative Language API backend.
//!
//! Text goes through `generateContent`, which is the only Gemini surface that
//! honours per-request safety settings and a response JSON Schema. Images go
//! through the Imagen `predict` endpoint.

use super::{GeneratedImage, GenerationBackend, GenerationRequest, SafetySetting};
use crate::error::GenerationFailure;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// --- Wire types ---
mod wire {
    use super::{SafetySetting, Value};
    use serde::{Deserialize, Serialize};

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct GenerateContentRequest {
        pub contents: Vec<Content>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub safety_settings: Vec<SafetySetting>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub generation_config: Option<GenerationConfig>,
    }
    #[derive(Serialize)]
    pub(super) struct Content {
        pub role: &'static str,
        pub parts: Vec<Part>,
    }
    #[derive(Serialize)]
    pub(super) struct Part {
        pub text: String,
    }
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct GenerationConfig {
        pub response_mime_type: &'static str,
        pub response_json_schema: Value,
    }

    #[derive(Deserialize, Debug, Default)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct GenerateContentResponse {
        #[serde(default)]
        pub candidates: Vec<Candidate>,
        pub prompt_feedback: Option<PromptFeedback>,
    }
    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct Candidate {
        pub content: Option<CandidateContent>,
        pub finish_reason: Option<String>,
    }
    #[derive(Deserialize, Debug)]
    pub(super) struct CandidateContent {
        #[serde(default)]
        pub parts: Vec<CandidatePart>,
    }
    #[derive(Deserialize, Debug)]
    pub(super) struct CandidatePart {
        pub text: Option<String>,
    }
    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct PromptFeedback {
        pub block_reason: Option<String>,
    }

    #[derive(Serialize)]
    pub(super) struct PredictRequest {
        pub instances: Vec<PredictInstance>,
        pub parameters: PredictParameters,
    }
    #[derive(Serialize)]
    pub(super) struct PredictInstance {
        pub prompt: String,
    }
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct PredictParameters {
        pub sample_count: u32,
    }
    #[derive(Deserialize, Debug, Default)]
    pub(super) struct PredictResponse {
        #[serde(default)]
        pub predictions: Vec<Prediction>,
    }
    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct Prediction {
        pub bytes_base64_encoded: Option<String>,
        pub mime_type: Option<String>,
    }
}

/// A `GenerationBackend` talking to Gemini and Imagen directly.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    chat_model: String,
    image_model: String,
}

impl GeminiClient {
    /// Creates a client for the public endpoint.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Generative Language API key.
    /// * `chat_model` - Model used for text, e.g. "gemini-2.0-flash".
    /// * `image_model` - Imagen model used for pictures.
    pub fn new(api_key: String, chat_model: String, image_model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model,
            image_model,
        }
    }

    /// Points the client at another deployment of the same API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn post<B: serde::Serialize, R: serde::de::DeserializeOwned>(
        &self,
        url: String,
        body: &B,
    ) -> Result<R, GenerationFailure> {
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationFailure::Remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationFailure::Remote(format!("{}: {}", status, detail)));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| GenerationFailure::MalformedResponse(e.to_string()))
    }
}

fn build_content_request(request: GenerationRequest) -> wire::GenerateContentRequest {
    wire::GenerateContentRequest {
        contents: vec![wire::Content {
            role: "user",
            parts: vec![wire::Part {
                text: request.prompt,
            }],
        }],
        safety_settings: request.safety,
        generation_config: request
            .response_schema
            .map(|schema| wire::GenerationConfig {
                response_mime_type: "application/json",
                response_json_schema: schema,
            }),
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: wire::GenerateContentResponse) -> Result<String, GenerationFailure> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GenerationFailure::Remote(format!(
            "prompt blocked by provider: {}",
            reason
        )));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GenerationFailure::EmptyResponse)?;
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        debug!(finish_reason = ?candidate.finish_reason, "Gemini candidate carried no text");
        return Err(GenerationFailure::EmptyResponse);
    }
    Ok(text)
}

fn extract_image(response: wire::PredictResponse) -> Option<GeneratedImage> {
    response.predictions.into_iter().find_map(|p| {
        let data = p.bytes_base64_encoded.filter(|d| !d.is_empty())?;
        let mime = p.mime_type.unwrap_or_else(|| "image/png".to_string());
        Some(GeneratedImage::from_base64(&mime, &data))
    })
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationFailure> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.chat_model
        );
        let body = build_content_request(request);
        let response: wire::GenerateContentResponse = self.post(url, &body).await?;
        extract_text(response)
    }

    async fn generate_image(
        &self,
        prompt: String,
    ) -> Result<Option<GeneratedImage>, GenerationFailure> {
        let url = format!("{}/models/{}:predict", self.base_url, self.image_model);
        let body = wire::PredictRequest {
            instances: vec![wire::PredictInstance { prompt }],
            parameters: wire::PredictParameters { sample_count: 1 },
        };
        let response: wire::PredictResponse = self.post(url, &body).await?;
        Ok(extract_image(response))
    }
}
