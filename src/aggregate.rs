use chrono::Utc;
use tracing::warn;

use crate::types::{AggregateSummary, DeviceRecord, DeviceStatus};

/// Folds the complete record list into the run's summary in a single pass.
///
/// Computed once after every batch has reached a terminal state, never
/// incrementally mid-run. Permanently failed batches contributed no
/// records, so they are simply absent from the counts.
pub fn aggregate(records: &[DeviceRecord]) -> AggregateSummary {
    let mut online = 0usize;
    let mut offline = 0usize;
    let mut total_power = 0.0f64;

    for record in records {
        match record.status {
            DeviceStatus::Online => online += 1,
            DeviceStatus::Offline => offline += 1,
        }
        total_power += parse_power_kw(&record.power);
    }

    let total = records.len();
    let average = if total > 0 {
        total_power / total as f64
    } else {
        0.0
    };

    AggregateSummary {
        total_devices: total,
        online_devices: online,
        offline_devices: offline,
        total_power_kw: total_power,
        average_power_kw: average,
        generated_at: Utc::now(),
    }
}

/// Extracts the numeric magnitude from a `"<decimal> kW"` reading. A value
/// that fails to parse counts as zero power rather than failing the run.
fn parse_power_kw(power: &str) -> f64 {
    let magnitude = power
        .strip_suffix(" kW")
        .unwrap_or(power)
        .trim()
        .parse::<f64>();
    match magnitude {
        Ok(value) => value,
        Err(_) => {
            warn!(power, "Unparseable power reading, counting as 0");
            0.0
        }
    }
}
