//! Record batches stored as TOML.
//!
//! ```toml
//! [[record]]
//! code = "A"
//!
//! [[record]]
//! code = "B"
//! parent = "A"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::Record;

#[derive(Debug, Deserialize)]
struct RecordFile {
    #[serde(default, rename = "record")]
    records: Vec<Record>,
}

/// Parse and validate a record batch.
///
/// Codes must be non-empty. An empty `parent` is read as "no parent".
/// With `reject_duplicates`, a code appearing twice fails the whole batch.
pub fn parse_records(
    content: &str,
    source: &Path,
    reject_duplicates: bool,
) -> ApplicationResult<Vec<Record>> {
    let file: RecordFile = toml::from_str(content).map_err(|e| ApplicationError::Parse {
        path: source.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(file.records.len());
    for (position, mut record) in file.records.into_iter().enumerate() {
        record.code = record.code.trim().to_string();
        if record.code.is_empty() {
            return Err(ApplicationError::InvalidRecord {
                path: source.to_path_buf(),
                message: format!("record #{} has an empty code", position + 1),
            });
        }
        record.parent = record
            .parent
            .map(|parent| parent.trim().to_string())
            .filter(|parent| !parent.is_empty());

        if !seen.insert(record.code.clone()) && reject_duplicates {
            return Err(ApplicationError::DuplicateCode {
                path: source.to_path_buf(),
                code: record.code,
            });
        }
        records.push(record);
    }

    debug!(count = records.len(), source = %source.display(), "records parsed");
    Ok(records)
}
