//! Application startup and lifecycle management.
//!
//! Builds the shared clients once, binds the HTTP listener and serves the
//! pantry routes until a shutdown signal arrives.

use crate::config::PantryConfig;
use crate::handlers;
use crate::services::providers::groq::GroqProvider;
use crate::services::providers::ChatProvider;
use crate::services::store::SupabaseStore;
use crate::services::RecordStore;
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: PantryConfig,
    pub model: Arc<dyn ChatProvider>,
    pub store: Arc<dyn RecordStore>,
}

/// Build the HTTP router for the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health_check))
        .route("/analyze-fridge", post(handlers::analyze_fridge))
        .route("/generate-recipe", post(handlers::generate_recipe))
        .route("/history", get(handlers::history))
        .layer(TraceLayer::new_for_http())
        // Any origin, method and header; credentials allowed.
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the production Groq and Supabase clients.
    pub async fn build(config: PantryConfig) -> Result<Self, AppError> {
        let timeout = config.http.timeout;

        let model: Arc<dyn ChatProvider> = Arc::new(
            GroqProvider::new(&config.groq, timeout)
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        );
        if config.groq.api_key.is_none() {
            tracing::warn!("GROQ_API_KEY is not set; model calls will fail");
        }
        tracing::info!(
            vision_model = %config.groq.vision_model,
            text_model = %config.groq.text_model,
            "Initialized Groq provider"
        );

        let store: Arc<dyn RecordStore> = Arc::new(
            SupabaseStore::new(&config.supabase, timeout)
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        );
        match &config.supabase.url {
            Some(url) => tracing::info!(url = %url, "Initialized Supabase store"),
            None => tracing::warn!("SUPABASE_URL is not set; store calls will fail"),
        }

        Self::with_state(AppState {
            config,
            model,
            store,
        })
        .await
    }

    /// Build the application around already constructed clients.
    pub async fn with_state(state: AppState) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Pantry service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal is received.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
