use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::{AggregateSummary, DeviceRecord};

const DEVICES_FILE: &str = "devices.json";
const SUMMARY_FILE: &str = "summary.json";

/// Persists the run's artifacts: the raw record list in the order received
/// and the derived summary.
pub struct ReportWriter {
    out_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    pub fn write(&self, records: &[DeviceRecord], summary: &AggregateSummary) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;

        let devices_path = self.out_dir.join(DEVICES_FILE);
        fs::write(&devices_path, serde_json::to_string_pretty(records)?)?;

        let summary_path = self.out_dir.join(SUMMARY_FILE);
        fs::write(&summary_path, serde_json::to_string_pretty(summary)?)?;

        info!(
            devices = %devices_path.display(),
            summary = %summary_path.display(),
            "Report written"
        );
        Ok(())
    }
}
