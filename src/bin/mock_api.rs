use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use energygrid::admission::AdmissionGate;
use energygrid::config::Config;
use energygrid::server::{self, ServiceState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let state = Arc::new(ServiceState {
        shared_secret: config.shared_secret.clone(),
        max_batch_size: config.batch_size,
        gate: AdmissionGate::new(config.rate_limit_interval()),
    });
    let app = server::app(state);

    info!(
        addr = %config.listen_addr,
        window_ms = config.rate_limit_interval_ms,
        max_batch_size = config.batch_size,
        "Mock query API listening"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
