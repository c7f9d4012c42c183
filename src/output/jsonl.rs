use crate::output::{OutputResult, RecordSink};
use crate::Record;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Newline-delimited JSON sink
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonlSink;

impl RecordSink for JsonlSink {
    fn extension(&self) -> &'static str {
        "jsonl"
    }

    fn write(&self, path: &Path, records: &[Record]) -> OutputResult<()> {
        write_jsonl(path, records)
    }
}

/// Writes one compact JSON object per line, UTF-8, non-ASCII unescaped
pub fn write_jsonl(path: &Path, records: &[Record]) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}
