use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use energygrid::aggregate;
use energygrid::batch;
use energygrid::config::Config;
use energygrid::fetch::BatchFetcher;
use energygrid::report::ReportWriter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    info!(
        base_url = %config.base_url,
        device_count = config.device_count,
        batch_size = config.batch_size,
        "Starting fleet query run"
    );

    let serials = batch::enumerate_serials(config.device_count);
    let batches = batch::plan(&serials, config.batch_size);
    info!(batches = batches.len(), "Planned batches");

    let fetcher = BatchFetcher::new(&config)?;
    let records = fetcher.run(&batches).await;

    let summary = aggregate::aggregate(&records);
    info!(
        total_devices = summary.total_devices,
        online = summary.online_devices,
        offline = summary.offline_devices,
        "Run complete"
    );

    ReportWriter::new(&config.report_dir).write(&records, &summary)?;
    Ok(())
}
