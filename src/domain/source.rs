use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::models::ContestRow;
use crate::errors::with_load_context;
use crate::rating::ContestRecord;

/// Reads a JSON array of contest rows and converts them to engine records.
pub fn load_contest_records<P: AsRef<Path>>(path: P) -> Result<Vec<ContestRecord>> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let json = with_load_context(fs::read_to_string(path), &display)?;
    let rows = parse_contest_rows(&json)
        .with_context(|| format!("Failed to parse contest records in {}", display))?;

    info!("Loaded {} contest records from {}", rows.len(), display);
    Ok(rows.into_iter().map(ContestRow::into_record).collect())
}

pub fn parse_contest_rows(json: &str) -> Result<Vec<ContestRow>> {
    serde_json::from_str(json).with_context(|| {
        let preview: String = json.chars().take(200).collect();
        format!("Invalid contest JSON. First 200 chars: {}", preview)
    })
}
