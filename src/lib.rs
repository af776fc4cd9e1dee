//! Batch retrieval of fleet power readings from a rate-limited,
//! signature-authenticated query service, plus the mock service itself.

pub mod admission;
pub mod aggregate;
pub mod backoff;
pub mod batch;
pub mod config;
pub mod error;
pub mod fetch;
pub mod report;
pub mod server;
pub mod signature;
pub mod types;
