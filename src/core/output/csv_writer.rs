//! CSV output writer.

use std::fs::File;
use std::io::Write;

use crate::core::models::OutputConfig;
use crate::core::report::Report;
use crate::error::{Result, TurnpackError};

/// Writes the wide table to a CSV file.
///
/// # Format
/// - Delimiter: `OutputConfig::delimiter` (`;` by default)
/// - Columns: metadata, then `U1;A1;...;Un;An`
/// - Encoding: UTF-8, multi-line cells quoted
pub fn write_csv(report: &Report, output_path: &str, config: &OutputConfig) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(report, file, config)?;
    Ok(())
}

/// Renders the wide table as a CSV string.
pub fn to_csv(report: &Report, config: &OutputConfig) -> Result<String> {
    let bytes = write_records(report, Vec::new(), config)?;
    String::from_utf8(bytes).map_err(|e| TurnpackError::invalid_format("csv", e.to_string()))
}

fn write_records<W: Write>(report: &Report, sink: W, config: &OutputConfig) -> Result<W> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .from_writer(sink);

    writer.write_record(report.header())?;
    for row in report.rows() {
        writer.write_record(&row)?;
    }

    writer.flush()?;
    writer.into_inner().map_err(|e| e.into_error().into())
}
