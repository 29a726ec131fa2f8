use super::{GeneratedImage, GenerationBackend, GenerationRequest};
use crate::error::GenerationFailure;
use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateImageRequestArgs,
        Image, ImageModel, ImageResponseFormat, ResponseFormat, ResponseFormatJsonSchema,
    },
};
use async_trait::async_trait;
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that creates machine learning study material.";

/// An implementation of `GenerationBackend` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    chat_model: String,
    image_model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `chat_model` - The model identifier to use for chat completions (e.g., "gpt-4o").
    /// * `image_model` - The model identifier to use for image generation.
    pub fn new(config: OpenAIConfig, chat_model: String, image_model: String) -> Self {
        Self {
            client: Client::with_config(config),
            chat_model,
            image_model,
        }
    }

    fn chat_request(
        &self,
        request: GenerationRequest,
    ) -> Result<CreateChatCompletionRequest, OpenAIError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.chat_model).messages(vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.prompt)
                .build()?
                .into(),
        ]);

        if let Some(schema) = request.response_schema {
            args.response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: "response".to_string(),
                    schema: Some(schema),
                    strict: None,
                },
            });
        }

        args.build()
    }
}

fn remote(err: OpenAIError) -> GenerationFailure {
    GenerationFailure::Remote(err.to_string())
}

#[async_trait]
impl GenerationBackend for OpenAICompatibleClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationFailure> {
        if !request.safety.is_empty() {
            debug!(
                overrides = request.safety.len(),
                "Safety overrides have no OpenAI-compatible equivalent; ignoring."
            );
        }
        let request = self.chat_request(request).map_err(remote)?;
        let response = self.client.chat().create(request).await.map_err(remote)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationFailure::EmptyResponse)
    }

    async fn generate_image(
        &self,
        prompt: String,
    ) -> Result<Option<GeneratedImage>, GenerationFailure> {
        let request = CreateImageRequestArgs::default()
            .prompt(prompt)
            .model(ImageModel::Other(self.image_model.clone()))
            .n(1)
            .response_format(ImageResponseFormat::B64Json)
            .build()
            .map_err(remote)?;

        let response = self.client.images().create(request).await.map_err(remote)?;

        Ok(response
            .data
            .iter()
            .find_map(|image| match image.as_ref() {
                Image::B64Json { b64_json, .. } => {
                    Some(GeneratedImage::from_base64("image/png", b64_json))
                }
                Image::Url { url, .. } => Some(GeneratedImage {
                    url: url.to_string(),
                }),
            }))
    }
}
