//! scangate — HTTP front for external security scanners.

use sg_server::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        remote = %config.remote.base_url,
        project = %config.remote.project_key,
        scan_timeout_secs = config.scan_timeout.as_secs(),
        "loaded configuration"
    );

    sg_server::serve(config).await
}
