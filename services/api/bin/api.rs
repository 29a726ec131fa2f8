//! Main Entrypoint for the ML Tutor API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Building the generation backend for the configured provider.
//! 3. Constructing the Axum router and applying middleware.
//! 4. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tutor_api::{
    config::{Config, Provider},
    router::create_router,
    state::AppState,
};
use tutor_core::{
    FlowInvoker, InvokerConfig, Tutor,
    backend::{GeminiClient, GenerationBackend, OpenAICompatibleClient},
};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
        return;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

fn build_backend(config: &Config) -> anyhow::Result<Arc<dyn GenerationBackend>> {
    let backend: Arc<dyn GenerationBackend> = match config.provider {
        Provider::OpenAI => {
            info!("Using OpenAI provider.");
            let api_key = config
                .openai_api_key
                .as_ref()
                .context("OPENAI_API_KEY is required for the 'openai' provider")?;
            let api_base = config
                .api_base_url
                .as_deref()
                .unwrap_or("https://api.openai.com/v1");
            let openai_config = OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base(api_base);
            Arc::new(OpenAICompatibleClient::new(
                openai_config,
                config.chat_model.clone(),
                config.image_model.clone(),
            ))
        }
        Provider::Gemini => {
            info!("Using Gemini provider.");
            let api_key = config
                .gemini_api_key
                .as_ref()
                .context("GEMINI_API_KEY is required for the 'gemini' provider")?;
            let client = GeminiClient::new(
                api_key.clone(),
                config.chat_model.clone(),
                config.image_model.clone(),
            );
            match &config.api_base_url {
                Some(base_url) => Arc::new(client.with_base_url(base_url.clone())),
                None => Arc::new(client),
            }
        }
    };
    Ok(backend)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize Shared Services ---
    let backend = build_backend(&config)?;
    let invoker = FlowInvoker::new(
        backend,
        InvokerConfig {
            timeout: config.generation_timeout,
        },
    );
    let app_state = Arc::new(AppState {
        tutor: Arc::new(Tutor::new(invoker, config.visual_mode)),
    });

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        provider = ?config.provider,
        chat_model = %config.chat_model,
        image_model = %config.image_model,
        visual_mode = ?config.visual_mode,
        timeout_secs = config.generation_timeout.as_secs(),
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server has shut down.");
    Ok(())
}
