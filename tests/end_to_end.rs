//! Whole-pipeline runs against an in-process query service: plan, fetch,
//! aggregate, persist.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use energygrid::admission::AdmissionGate;
use energygrid::aggregate::aggregate;
use energygrid::batch;
use energygrid::config::Config;
use energygrid::fetch::BatchFetcher;
use energygrid::report::ReportWriter;
use energygrid::server::{self, ServiceState};

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn run_config(addr: SocketAddr, device_count: usize, report_dir: &str) -> Config {
    Config {
        base_url: format!("http://{addr}"),
        query_path: "/device/real/query".to_string(),
        shared_secret: "interview_token_123".to_string(),
        device_count,
        batch_size: 10,
        max_attempts: 5,
        retry_delay_ms: 5,
        inter_batch_delay_ms: 0,
        rate_limit_interval_ms: 0,
        request_timeout_secs: 5,
        listen_addr: String::new(),
        report_dir: report_dir.to_string(),
    }
}

#[tokio::test]
async fn all_success_run_reports_every_device() {
    let state = Arc::new(ServiceState {
        shared_secret: "interview_token_123".to_string(),
        max_batch_size: 10,
        gate: AdmissionGate::new(Duration::ZERO),
    });
    let addr = spawn(server::app(state)).await;

    let dir = tempfile::tempdir().unwrap();
    let config = run_config(addr, 500, dir.path().to_str().unwrap());

    let serials = batch::enumerate_serials(config.device_count);
    let batches = batch::plan(&serials, config.batch_size);
    assert_eq!(batches.len(), 50);

    let fetcher = BatchFetcher::new(&config).unwrap();
    let records = fetcher.run(&batches).await;
    assert_eq!(records.len(), 500);

    // Records arrive in planned order because batches run sequentially.
    let fetched: Vec<&str> = records.iter().map(|r| r.sn.as_str()).collect();
    let expected: Vec<&str> = serials.iter().map(|s| s.as_str()).collect();
    assert_eq!(fetched, expected);

    let summary = aggregate(&records);
    assert_eq!(summary.total_devices, 500);
    assert_eq!(
        summary.online_devices + summary.offline_devices,
        summary.total_devices
    );

    ReportWriter::new(&config.report_dir)
        .write(&records, &summary)
        .unwrap();
    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("devices.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(raw.as_array().unwrap().len(), 500);
}

#[tokio::test]
async fn all_rate_limited_run_reports_nothing() {
    let router = Router::new().route(
        "/device/real/query",
        post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({ "error": "Too Many Requests. Limit: 1 req/sec." })),
            )
                .into_response()
        }),
    );
    let addr = spawn(router).await;

    let dir = tempfile::tempdir().unwrap();
    let config = run_config(addr, 30, dir.path().to_str().unwrap());

    let serials = batch::enumerate_serials(config.device_count);
    let batches = batch::plan(&serials, config.batch_size);

    let fetcher = BatchFetcher::new(&config).unwrap();
    let records = fetcher.run(&batches).await;
    assert!(records.is_empty());

    let summary = aggregate(&records);
    assert_eq!(summary.total_devices, 0);

    ReportWriter::new(&config.report_dir)
        .write(&records, &summary)
        .unwrap();
    let summary_json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("summary.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(summary_json["total_devices"], 0);
    assert_eq!(summary_json["average_power_kw"], "0.00");
    assert_eq!(summary_json["total_power_kw"], "0.00");
}

#[tokio::test]
async fn run_against_the_real_gate_respects_its_cadence() {
    // A tight window with an even tighter client cadence: the fetcher's
    // retries are what let every batch through eventually.
    let state = Arc::new(ServiceState {
        shared_secret: "interview_token_123".to_string(),
        max_batch_size: 10,
        gate: AdmissionGate::new(Duration::from_millis(30)),
    });
    let addr = spawn(server::app(state)).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = run_config(addr, 30, dir.path().to_str().unwrap());
    config.retry_delay_ms = 75;
    config.inter_batch_delay_ms = 0;

    let serials = batch::enumerate_serials(config.device_count);
    let batches = batch::plan(&serials, config.batch_size);

    let fetcher = BatchFetcher::new(&config).unwrap();
    let records = fetcher.run(&batches).await;
    assert_eq!(records.len(), 30);
}
