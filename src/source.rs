//! Loading subscription records from a file or the CRM's HTTP endpoint.
//!
//! The endpoint answers either `{ "lines": [...] }` or a bare array of
//! records; both shapes are accepted.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::SourceLocation;
use crate::error::{AppError, AppResult};
use crate::models::SubscriptionRecord;

/// Records that fail to deserialize are skipped with a warning; only a
/// payload of the wrong shape is an error.
pub fn parse_payload(bytes: &[u8]) -> AppResult<Vec<SubscriptionRecord>> {
    let value: Value = serde_json::from_slice(bytes)?;
    let lines = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("lines") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => {
                return Err(AppError::Source(
                    "payload object has no \"lines\" array".into(),
                ))
            }
            Some(_) => return Err(AppError::Source("\"lines\" is not an array".into())),
        },
        _ => {
            return Err(AppError::Source(
                "expected an array or an object with \"lines\"".into(),
            ))
        }
    };

    let mut records = Vec::with_capacity(lines.len());
    for line in lines {
        let name = line
            .get("SubscriptionName")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
            .to_string();
        match serde_json::from_value::<SubscriptionRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => warn!(
                subscription = %name,
                error = %e,
                "Skipping unreadable subscription record"
            ),
        }
    }
    Ok(records)
}

pub async fn fetch(
    location: &SourceLocation,
    client: &reqwest::Client,
) -> AppResult<Vec<SubscriptionRecord>> {
    debug!(source = %location.describe(), "Fetching subscription records");
    let bytes = match location {
        SourceLocation::File(path) => tokio::fs::read(path).await.map_err(|e| {
            AppError::Source(format!("cannot read {}: {}", path.display(), e))
        })?,
        SourceLocation::Url(url) => client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec(),
    };

    let records = parse_payload(&bytes)?;
    info!(
        source = %location.describe(),
        count = records.len(),
        "Loaded subscription records"
    );
    Ok(records)
}
