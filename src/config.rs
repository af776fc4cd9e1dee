use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub base_url: String,
    pub query_path: String,
    pub shared_secret: String,
    pub device_count: usize,
    pub batch_size: usize,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub inter_batch_delay_ms: u64,
    pub rate_limit_interval_ms: u64,
    pub request_timeout_secs: u64,
    pub listen_addr: String,
    pub report_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let query_path =
            env::var("QUERY_PATH").unwrap_or_else(|_| "/device/real/query".to_string());
        let shared_secret =
            env::var("SHARED_SECRET").unwrap_or_else(|_| "interview_token_123".to_string());

        let device_count = get_env_var_u64("DEVICE_COUNT", 500) as usize;
        let batch_size = get_env_var_u64("BATCH_SIZE", 10) as usize;
        let max_attempts = get_env_var_u64("MAX_ATTEMPTS", 5) as u32;
        let retry_delay_ms = get_env_var_u64("RETRY_DELAY_MS", 1500);
        let inter_batch_delay_ms = get_env_var_u64("INTER_BATCH_DELAY_MS", 1000);
        let rate_limit_interval_ms = get_env_var_u64("RATE_LIMIT_INTERVAL_MS", 950);
        let request_timeout_secs = get_env_var_u64("REQUEST_TIMEOUT_SECS", 30);

        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let report_dir = env::var("REPORT_DIR").unwrap_or_else(|_| "./reports".to_string());

        Ok(Config {
            base_url,
            query_path,
            shared_secret,
            device_count,
            batch_size,
            max_attempts,
            retry_delay_ms,
            inter_batch_delay_ms,
            rate_limit_interval_ms,
            request_timeout_secs,
            listen_addr,
            report_dir,
        })
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn inter_batch_delay(&self) -> Duration {
        Duration::from_millis(self.inter_batch_delay_ms)
    }

    pub fn rate_limit_interval(&self) -> Duration {
        Duration::from_millis(self.rate_limit_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn query_url(&self) -> String {
        format!("{}{}", self.base_url, self.query_path)
    }
}

fn get_env_var_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(default)
}
