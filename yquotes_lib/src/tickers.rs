//! Ticker list loading.

use std::path::Path;

use serde_json::Value;

use crate::error::SyncError;

/// Loads the ticker list from a JSON file.
///
/// Accepts either an array of symbols or an object whose values are
/// symbols, in file order. A missing, unreadable, or empty list is a
/// configuration error: the run aborts before any processing.
pub fn load_tickers(path: &Path) -> Result<Vec<String>, SyncError> {
    let bytes = std::fs::read(path).map_err(|e| {
        SyncError::Config(format!(
            "ticker list {} not found or unreadable: {}",
            path.display(),
            e
        ))
    })?;

    let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
        SyncError::Config(format!("ticker list {} is not valid JSON: {}", path.display(), e))
    })?;

    let tickers: Vec<String> = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(_, item)| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };

    if tickers.is_empty() {
        return Err(SyncError::Config(format!(
            "ticker list {} is empty or incorrect",
            path.display()
        )));
    }

    Ok(tickers)
}
