//! Flow Invoker
//!
//! Sends one rendered prompt to the configured backend, bounds the call with a
//! timeout, and turns the raw answer into a typed result or a
//! `GenerationFailure`. Nothing here retries.

use crate::backend::{GeneratedImage, GenerationBackend, GenerationRequest, SafetySetting};
use crate::error::GenerationFailure;
use crate::schema::OutputContract;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Per-process invoker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokerConfig {
    /// Upper bound on a single outbound call.
    pub timeout: Duration,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }
}

/// Per-call overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    pub safety: Vec<SafetySetting>,
}

impl InvokeOptions {
    /// Options asking the provider not to block dangerous-content or harassment.
    pub fn permissive() -> Self {
        Self {
            safety: SafetySetting::permissive(),
        }
    }
}

pub struct FlowInvoker {
    backend: Arc<dyn GenerationBackend>,
    config: InvokerConfig,
}

impl FlowInvoker {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: InvokerConfig) -> Self {
        Self { backend, config }
    }

    /// Runs `call` under the configured timeout. On expiry the call's future is
    /// dropped, which cancels the in-flight request.
    async fn bounded<T, F>(&self, call: F) -> Result<T, GenerationFailure>
    where
        F: Future<Output = Result<T, GenerationFailure>>,
    {
        tokio::time::timeout(self.config.timeout, call)
            .await
            .map_err(|_| GenerationFailure::Timeout(self.config.timeout))?
    }

    /// Asks for JSON matching `T`'s schema and validates the answer against `T`.
    #[instrument(name = "invoke_structured", skip_all, fields(flow = flow))]
    pub async fn structured<T: OutputContract>(
        &self,
        flow: &'static str,
        prompt: String,
        options: InvokeOptions,
    ) -> Result<T, GenerationFailure> {
        let request = GenerationRequest {
            prompt,
            response_schema: Some(T::response_schema()),
            safety: options.safety,
        };
        let raw = self.bounded(self.backend.generate(request)).await?;
        let value = parse_json(&raw)?;
        let result = T::validate_output(&value)?;
        debug!("Structured response accepted.");
        Ok(result)
    }

    /// Asks for free text. Blank answers count as no content.
    #[instrument(name = "invoke_text", skip_all, fields(flow = flow))]
    pub async fn text(
        &self,
        flow: &'static str,
        prompt: String,
        options: InvokeOptions,
    ) -> Result<String, GenerationFailure> {
        let request = GenerationRequest {
            prompt,
            response_schema: None,
            safety: options.safety,
        };
        let text = self.bounded(self.backend.generate(request)).await?;
        if text.trim().is_empty() {
            return Err(GenerationFailure::EmptyResponse);
        }
        Ok(text)
    }

    /// Asks for one image; `Ok(None)` when the provider produced no media.
    #[instrument(name = "invoke_image", skip_all, fields(flow = flow))]
    pub async fn image(
        &self,
        flow: &'static str,
        prompt: String,
    ) -> Result<Option<GeneratedImage>, GenerationFailure> {
        self.bounded(self.backend.generate_image(prompt)).await
    }
}

/// Parses model output as JSON, tolerating a surrounding Markdown code fence.
fn parse_json(raw: &str) -> Result<Value, GenerationFailure> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(body.trim())
        .map_err(|e| GenerationFailure::MalformedResponse(e.to_string()))
}
