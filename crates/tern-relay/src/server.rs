//! Router construction and the HTTP server loop

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tern_ai::providers::google::GoogleProvider;

use crate::{config::RelayConfig, handler};

/// Shared, immutable state handed to every request
#[derive(Debug, Clone)]
pub struct AppState {
    /// `None` when no API key is configured; chat requests then fail
    pub provider: Option<Arc<GoogleProvider>>,
}

impl AppState {
    pub fn from_config(config: &RelayConfig) -> Self {
        let provider = config.api_key.as_ref().map(|key| {
            Arc::new(
                GoogleProvider::new(key.clone())
                    .with_base_url(config.base_url.clone())
                    .with_model(config.model.clone()),
            )
        });
        Self { provider }
    }
}

/// Build the router with all relay routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handler::health))
        .route(
            "/api/chat",
            post(handler::chat).fallback(handler::method_not_allowed),
        )
        .with_state(state)
}

/// Run the relay until `shutdown` resolves
pub async fn serve(
    config: RelayConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let state = AppState::from_config(&config);
    if state.provider.is_none() {
        tracing::warn!("no API key configured; chat requests will be rejected");
    }

    let app = build_router(state);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, model = %config.model, "relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("relay shutting down");
        })
        .await?;

    Ok(())
}
