//! Stored selection format
//!
//! The only durable artifact is the ordered list of selected names, stored as
//! a JSON string array. Older records may hold colon-joined paths
//! (`"Sweet:Chocolate:Dark Chocolate"`) or a single bare string; both are
//! read back as leaf names.

use itertools::Itertools;
use serde_json::Value;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::LEGACY_PATH_SEPARATOR;

/// Last segment of a legacy colon path; plain names pass through unchanged.
pub fn leaf_name(stored: &str) -> &str {
    if stored.contains(LEGACY_PATH_SEPARATOR) {
        stored
            .rsplit(LEGACY_PATH_SEPARATOR)
            .map(str::trim)
            .find(|seg| !seg.is_empty())
            .unwrap_or(stored)
    } else {
        stored
    }
}

/// Decode a stored record into names, first occurrence wins.
pub fn decode_stored(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let names: Vec<String> = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                other => {
                    debug!("skipping non-string stored entry: {}", other);
                    None
                }
            })
            .collect(),
        Ok(Value::String(single)) => vec![single],
        _ => {
            debug!("legacy plain-string record");
            vec![raw.to_string()]
        }
    };

    names
        .iter()
        .map(|name| leaf_name(name).trim().to_string())
        .filter(|name| !name.is_empty())
        .unique()
        .collect()
}

/// Encode names for storage.
pub fn encode_stored(names: &[String]) -> ApplicationResult<String> {
    serde_json::to_string(names).map_err(|e| ApplicationError::OperationFailed {
        context: "encode selection".to_string(),
        source: Box::new(e),
    })
}
