//! Batch file reading - NDJSON records into EventRecords.

use serde::Deserialize;
use std::path::Path;

use contracts::EventRecord;

use crate::error::{CliError, Result};

/// On-disk record shape: payload as a JSON string for hand-editability
#[derive(Debug, Deserialize)]
struct RecordSpec {
    source_id: String,
    partition_key: String,
    event_id: String,
    event_type: String,
    payload: String,
}

impl From<RecordSpec> for EventRecord {
    fn from(spec: RecordSpec) -> Self {
        EventRecord {
            source_id: spec.source_id,
            partition_key: spec.partition_key,
            event_id: spec.event_id,
            event_type: spec.event_type,
            payload: spec.payload.into_bytes().into(),
        }
    }
}

/// Read a batch file: one JSON record per line, blank lines ignored.
///
/// # Errors
/// Fails on unreadable files or any malformed line (reported with its line
/// number); a batch is either fully parsed or rejected.
pub fn read_batch(path: &Path) -> Result<Vec<EventRecord>> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::batch_read(&display, e.to_string()))?;

    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let spec: RecordSpec = serde_json::from_str(line)
            .map_err(|e| CliError::batch_parse(&display, index + 1, e.to_string()))?;
        records.push(spec.into());
    }

    Ok(records)
}
