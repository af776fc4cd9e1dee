use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use tracing::{error, info, warn};

use crate::backoff::BackoffPolicy;
use crate::config::Config;
use crate::error::FetchError;
use crate::signature::compute_signature;
use crate::types::{DeviceQueryRequest, DeviceQueryResponse, DeviceRecord, ErrorBody};

/// Terminal state of one batch.
#[derive(Debug)]
pub enum BatchOutcome {
    Success(Vec<DeviceRecord>),
    /// All attempts failed, or a non-retryable failure cut the attempt
    /// loop short. The error is the one observed on the final attempt.
    PermanentFailure(FetchError),
}

/// Drives batches through the query endpoint one at a time, retrying each
/// batch up to `max_attempts` times before giving up on it.
pub struct BatchFetcher {
    client: Client,
    query_url: String,
    query_path: String,
    shared_secret: String,
    max_attempts: u32,
    backoff: BackoffPolicy,
    inter_batch_delay: Duration,
}

impl BatchFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            client,
            query_url: config.query_url(),
            query_path: config.query_path.clone(),
            shared_secret: config.shared_secret.clone(),
            max_attempts: config.max_attempts,
            backoff: BackoffPolicy::Constant {
                delay: config.retry_delay(),
            },
            inter_batch_delay: config.inter_batch_delay(),
        })
    }

    /// Overrides the default constant-delay retry policy.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// One signed request for one batch. Each attempt gets a fresh
    /// timestamp and signature; signatures are never reused.
    async fn attempt(&self, sn_list: &[String]) -> Result<Vec<DeviceRecord>, FetchError> {
        let timestamp = Utc::now().timestamp_millis().to_string();
        let signature = compute_signature(&self.query_path, &self.shared_secret, &timestamp);

        let response = self
            .client
            .post(&self.query_url)
            .header("timestamp", &timestamp)
            .header("signature", &signature)
            .json(&DeviceQueryRequest {
                sn_list: sn_list.to_vec(),
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: DeviceQueryResponse = response.json().await?;
            return Ok(body.data);
        }

        match status {
            StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
            StatusCode::UNAUTHORIZED => Err(FetchError::Auth(read_error_body(response).await)),
            StatusCode::BAD_REQUEST => {
                Err(FetchError::InvalidRequest(read_error_body(response).await))
            }
            other => Err(FetchError::Server(other.as_u16())),
        }
    }

    /// Runs one batch to a terminal state.
    pub async fn fetch_batch(&self, sn_list: &[String]) -> BatchOutcome {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.attempt(sn_list).await {
                Ok(records) => return BatchOutcome::Success(records),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff.delay_for(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return BatchOutcome::PermanentFailure(err),
            }
        }
    }

    /// Processes every batch sequentially, folding successful results into
    /// one accumulated record list. A permanently failed batch contributes
    /// nothing and never aborts the run.
    pub async fn run(&self, batches: &[Vec<String>]) -> Vec<DeviceRecord> {
        let total = batches.len();
        let mut records = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            let batch_no = index + 1;
            match self.fetch_batch(batch).await {
                BatchOutcome::Success(mut fetched) => {
                    info!(batch = batch_no, total, count = fetched.len(), "Batch fetched");
                    records.append(&mut fetched);
                }
                BatchOutcome::PermanentFailure(err) => {
                    error!(batch = batch_no, total, error = %err, "Batch permanently failed");
                }
            }
            // Unconditional pause between batches to respect the server's
            // request cadence, regardless of how the batch ended.
            tokio::time::sleep(self.inter_batch_delay).await;
        }

        records
    }
}

async fn read_error_body(response: reqwest::Response) -> String {
    match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => "no error detail".to_string(),
    }
}
