use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reported state of a device in a query response.
///
/// The upstream service only ever emits `Online` or `Offline`, but any
/// unrecognized value is folded into `Offline` rather than failing the
/// whole batch.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    Online,
    #[serde(other)]
    Offline,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DeviceRecord {
    pub sn: String,
    /// Power reading serialized as `"<decimal> kW"`, e.g. `"3.42 kW"`.
    pub power: String,
    pub status: DeviceStatus,
    pub last_updated: DateTime<Utc>,
}

// Request body for POST /device/real/query.
#[derive(Serialize, Deserialize, Debug)]
pub struct DeviceQueryRequest {
    pub sn_list: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DeviceQueryResponse {
    pub data: Vec<DeviceRecord>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

/// Totals derived from the complete record list at the end of a run.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AggregateSummary {
    pub total_devices: usize,
    pub online_devices: usize,
    pub offline_devices: usize,
    #[serde(
        serialize_with = "two_decimals",
        deserialize_with = "from_two_decimals"
    )]
    pub total_power_kw: f64,
    #[serde(
        serialize_with = "two_decimals",
        deserialize_with = "from_two_decimals"
    )]
    pub average_power_kw: f64,
    pub generated_at: DateTime<Utc>,
}

fn two_decimals<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format!("{value:.2}"))
}

fn from_two_decimals<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse::<f64>().map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_folds_into_offline() {
        let record: DeviceRecord = serde_json::from_str(
            r#"{"sn":"SN-000001","power":"1.00 kW","status":"Degraded","last_updated":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(record.status, DeviceStatus::Offline);
    }

    #[test]
    fn summary_power_fields_serialize_as_two_decimal_strings() {
        let summary = AggregateSummary {
            total_devices: 3,
            online_devices: 2,
            offline_devices: 1,
            total_power_kw: 7.5,
            average_power_kw: 2.5,
            generated_at: Utc::now(),
        };
        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_power_kw"], "7.50");
        assert_eq!(json["average_power_kw"], "2.50");
    }
}
