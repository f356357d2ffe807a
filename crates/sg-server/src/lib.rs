//! sg-server: HTTP surface for scangate.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use config::AppConfig;
use state::{AppState, SharedState};
use tower_http::trace::TraceLayer;

/// Build the full router over the given state.
pub fn app(state: SharedState) -> Router {
    routes::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let addr = config.listen_addr;
    let app = app(AppState::shared(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("scangate listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutting down gracefully");
        })
        .await?;
    Ok(())
}
