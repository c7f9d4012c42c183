use crate::output::{OutputResult, RecordSink};
use crate::Record;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

/// CSV sink with a header covering every key of every record
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSink;

impl RecordSink for CsvSink {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn write(&self, path: &Path, records: &[Record]) -> OutputResult<()> {
        write_csv(path, records)
    }
}

/// Writes `records` as UTF-8 CSV
///
/// The header is the sorted union of all record keys. A record missing a key
/// gets an empty cell, as does a null value. Nested arrays and objects are
/// written as compact JSON. No records means an empty file.
pub fn write_csv(path: &Path, records: &[Record]) -> OutputResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let columns = header(records);
    if !columns.is_empty() {
        writer.write_record(&columns)?;
        for record in records {
            writer.write_record(columns.iter().map(|column| cell(record.get(*column))))?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn header(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
