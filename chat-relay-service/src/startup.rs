//! Application startup and lifecycle management.

use crate::config::RelayConfig;
use crate::handlers::{chat, health};
use crate::services::providers::gemini::{GeminiChatProvider, GeminiConfig};
use crate::services::providers::ChatProvider;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use relay_core::error::AppError;
use relay_core::middleware::tracing::request_id_middleware;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state. The provider is the only capability a
/// request needs; it is read-only and safe to share without locking.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ChatProvider>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(chat))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the Gemini provider from configuration.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let gemini_config = GeminiConfig {
            api_key: config.google.api_key.clone(),
            model: config.model.name.clone(),
            system_instruction: config.model.system_instruction.clone(),
            request_timeout: config.request_timeout,
        };
        let provider = GeminiChatProvider::new(gemini_config)
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{}", e)))?;

        tracing::info!(
            model = %config.model.name,
            timeout_secs = config.request_timeout.as_secs(),
            "Initialized Gemini chat provider"
        );

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build with an injected provider; used by tests to substitute a mock.
    pub async fn build_with_provider(
        config: RelayConfig,
        provider: Arc<dyn ChatProvider>,
    ) -> Result<Self, AppError> {
        let state = AppState { provider };

        // Bind listener (port 0 = random port for testing)
        let addr = config.listen.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped by SIGINT/SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        tracing::info!("Chat relay listening on port {}", self.port);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
