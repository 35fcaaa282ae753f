//! JSON Lines (JSONL) output writer.
//!
//! One row object per line, keys in column order. Convenient for loading
//! the table into dataframe tools or streaming it to another process.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::core::report::Report;
use crate::error::Result;

/// Writes the wide table as JSON Lines.
///
/// ```jsonl
/// {"interaccion_id":"a",...,"U1":"hola","A1":"buenas"}
/// {"interaccion_id":"b",...,"U1":"2+2?","A1":"4"}
/// ```
pub fn write_jsonl(report: &Report, output_path: &str) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_lines(report, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Renders the wide table as a JSON Lines string.
pub fn to_jsonl(report: &Report) -> Result<String> {
    let mut buffer = Vec::new();
    write_lines(report, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_lines<W: Write>(report: &Report, writer: &mut W) -> Result<()> {
    for row in report.row_objects() {
        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
