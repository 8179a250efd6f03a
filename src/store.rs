// SPDX-License-Identifier: AGPL-3.0-or-later
//! CSV collection file: append results, read them back for rendering.

use std::fs::{self, OpenOptions};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::BenchmarkResult;

/// Default collection file written by `record`.
pub const DEFAULT_DATA_PATH: &str = "cpuisfast/data.csv";

/// Column names of the collection file, in order.
pub const FIELD_NAMES: [&str; 8] = [
    "model",
    "loop_per_second",
    "add_per_second",
    "system",
    "arch",
    "python_implementation",
    "python_version",
    "inserted_at",
];

/// A row of the collection file as read back for the page.
///
/// Values stay text; missing trailing columns are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedRow {
    pub model: Option<String>,
    pub loop_per_second: Option<String>,
    pub add_per_second: Option<String>,
    pub system: Option<String>,
    pub arch: Option<String>,
    pub python_implementation: Option<String>,
    pub python_version: Option<String>,
    pub inserted_at: Option<String>,
}

impl CollectedRow {
    fn from_record(record: &csv::StringRecord) -> Self {
        let field = |i: usize| record.get(i).map(str::to_string);
        Self {
            model: field(0),
            loop_per_second: field(1),
            add_per_second: field(2),
            system: field(3),
            arch: field(4),
            python_implementation: field(5),
            python_version: field(6),
            inserted_at: field(7),
        }
    }
}

/// Append `result` as one headerless row, creating the file and its
/// directory when needed.
pub fn append_result(path: impl AsRef<Path>, result: &BenchmarkResult) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.serialize(result)?;
    writer.flush()?;

    log::info!("Appended result to {}", path.display());
    Ok(())
}

/// Read every row of a headerless collection file.
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<CollectedRow>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() > FIELD_NAMES.len() {
            log::debug!(
                "Row at line {} has {} fields, extra ones ignored",
                record.position().map(|p| p.line()).unwrap_or(0),
                record.len()
            );
        }
        rows.push(CollectedRow::from_record(&record));
    }

    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
