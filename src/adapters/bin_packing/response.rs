//! Interpretation of the bin-packing service's answer.
//!
//! Unpacked items, an empty bin list and multiple bins are decisive; status 0
//! and unknown statuses are strategy failures the chain can recover from.

use crate::utils::error::{PackingError, Result};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    pub response: PackingResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackingResponse {
    pub status: i64,
    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
    #[serde(default)]
    pub not_packed_items: Vec<NotPackedItem>,
    #[serde(default)]
    pub bins_packed: Vec<PackedBin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotPackedItem {
    pub id: ApiId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackedBin {
    pub bin_data: BinData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinData {
    pub id: ApiId,
}

/// Ids go out as strings; the service may echo them back either way.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ApiId {
    Number(u64),
    Text(String),
}

impl ApiId {
    pub fn as_packaging_id(&self) -> Result<u64> {
        match self {
            ApiId::Number(id) => Ok(*id),
            ApiId::Text(raw) => raw.trim().parse().map_err(|_| {
                PackingError::strategy_failure(format!("Unrecognised bin id in response: {}", raw))
            }),
        }
    }
}

impl fmt::Display for ApiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiId::Number(id) => write!(f, "{}", id),
            ApiId::Text(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorLevel {
    Critical,
    Warning,
    Notice,
    Error,
}

impl ApiErrorLevel {
    pub fn parse(level: &str) -> Self {
        match level {
            "critical" => Self::Critical,
            "warning" => Self::Warning,
            "notice" => Self::Notice,
            _ => Self::Error,
        }
    }
}

/// Logs each reported error at its declared severity. Never fails.
pub fn log_api_errors(errors: &[ApiErrorEntry]) {
    for entry in errors {
        match ApiErrorLevel::parse(&entry.level) {
            ApiErrorLevel::Critical => tracing::error!(
                severity = "critical",
                "Packing error [{}]: {}",
                entry.level,
                entry.message
            ),
            ApiErrorLevel::Warning => {
                tracing::warn!("Packing error [{}]: {}", entry.level, entry.message)
            }
            ApiErrorLevel::Notice => tracing::info!(
                severity = "notice",
                "Packing error [{}]: {}",
                entry.level,
                entry.message
            ),
            ApiErrorLevel::Error => {
                tracing::error!("Packing error [{}]: {}", entry.level, entry.message)
            }
        }
    }
}

/// Returns the catalog id of the single bin the service packed into.
pub fn resolve_packed_bin(response: &PackingResponse) -> Result<u64> {
    log_api_errors(&response.errors);

    if let Some(item) = response.not_packed_items.first() {
        return Err(PackingError::not_found(format!(
            "Product ID: {} - cannot be packed into any bin due to size/weight limitations.",
            item.id
        )));
    }

    match response.status {
        0 => Err(PackingError::strategy_failure(
            "Critical error occurred during packing",
        )),
        1 => match response.bins_packed.as_slice() {
            [] => Err(PackingError::not_found_default()),
            [bin] => bin.bin_data.id.as_packaging_id(),
            bins => Err(PackingError::multiple_bins(bins.len())),
        },
        status => Err(PackingError::strategy_failure(format!(
            "Unhandled response status: {}",
            status
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> PackingResponse {
        serde_json::from_value::<ResponseEnvelope>(json!({ "response": value }))
            .unwrap()
            .response
    }

    #[test]
    fn test_single_bin_resolves_id() {
        let response = parse(json!({
            "status": 1,
            "errors": [],
            "not_packed_items": [],
            "bins_packed": [{"bin_data": {"id": "3", "w": 20, "h": 20, "d": 20}}]
        }));

        assert_eq!(resolve_packed_bin(&response).unwrap(), 3);
    }

    #[test]
    fn test_numeric_bin_id_is_accepted() {
        let response = parse(json!({
            "status": 1,
            "bins_packed": [{"bin_data": {"id": 4}}]
        }));

        assert_eq!(resolve_packed_bin(&response).unwrap(), 4);
    }

    #[test]
    fn test_not_packed_item_is_decisive_even_with_success_status() {
        let response = parse(json!({
            "status": 1,
            "not_packed_items": [{"id": "17", "w": 99}, {"id": "18"}],
            "bins_packed": [{"bin_data": {"id": "3"}}]
        }));

        let err = resolve_packed_bin(&response).unwrap_err();
        assert!(err.is_decisive());
        assert!(err.to_string().contains("Product ID: 17"));
    }

    #[test]
    fn test_not_packed_item_wins_over_status_zero() {
        let response = parse(json!({
            "status": 0,
            "not_packed_items": [{"id": 5}]
        }));

        let err = resolve_packed_bin(&response).unwrap_err();
        assert_eq!(err.error_code(), "suitable-package-not-found");
    }

    #[test]
    fn test_status_zero_is_strategy_failure() {
        let response = parse(json!({
            "status": 0,
            "errors": [{"level": "critical", "message": "boom"}]
        }));

        let err = resolve_packed_bin(&response).unwrap_err();
        assert!(err.is_strategy_failure());
        assert!(err.to_string().contains("Critical error occurred during packing"));
    }

    #[test]
    fn test_unknown_status_is_strategy_failure() {
        let err = resolve_packed_bin(&parse(json!({"status": 7}))).unwrap_err();
        assert!(err.is_strategy_failure());
        assert!(err.to_string().contains("Unhandled response status: 7"));
    }

    #[test]
    fn test_no_bins_is_decisive() {
        let err = resolve_packed_bin(&parse(json!({"status": 1, "bins_packed": []}))).unwrap_err();
        assert!(matches!(err, PackingError::SuitablePackageNotFound { .. }));
    }

    #[test]
    fn test_multiple_bins_is_decisive() {
        let response = parse(json!({
            "status": 1,
            "bins_packed": [{"bin_data": {"id": "1"}}, {"bin_data": {"id": "2"}}]
        }));

        let err = resolve_packed_bin(&response).unwrap_err();
        assert!(matches!(err, PackingError::MultipleBinsNotSupported { .. }));
        assert!(err.to_string().contains("Multiple bins (2)"));
    }

    #[test]
    fn test_garbled_bin_id_is_strategy_failure() {
        let response = parse(json!({
            "status": 1,
            "bins_packed": [{"bin_data": {"id": "box-a"}}]
        }));

        assert!(resolve_packed_bin(&response).unwrap_err().is_strategy_failure());
    }

    #[test]
    fn test_error_levels() {
        assert_eq!(ApiErrorLevel::parse("critical"), ApiErrorLevel::Critical);
        assert_eq!(ApiErrorLevel::parse("warning"), ApiErrorLevel::Warning);
        assert_eq!(ApiErrorLevel::parse("notice"), ApiErrorLevel::Notice);
        assert_eq!(ApiErrorLevel::parse("fatal"), ApiErrorLevel::Error);
        assert_eq!(ApiErrorLevel::parse(""), ApiErrorLevel::Error);
    }
}
