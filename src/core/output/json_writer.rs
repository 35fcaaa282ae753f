//! JSON output writer.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::core::models::OutputConfig;
use crate::core::report::Report;
use crate::error::Result;

/// Writes the wide table to a JSON file as an array of row objects.
///
/// # Format
/// ```json
/// [
///   {"interaccion_id": "a", "usuario_id": null, ..., "U1": "hola", "A1": "buenas"}
/// ]
/// ```
pub fn write_json(report: &Report, output_path: &str, config: &OutputConfig) -> Result<()> {
    let json = to_json(report, config)?;
    let mut file = BufWriter::new(File::create(output_path)?);
    file.write_all(json.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Renders the wide table as a JSON array string.
///
/// Keys follow column order; pretty printing is controlled by `config.pretty`.
pub fn to_json(report: &Report, config: &OutputConfig) -> Result<String> {
    let rows = report.row_objects();
    let json = if config.pretty {
        serde_json::to_string_pretty(&rows)?
    } else {
        serde_json::to_string(&rows)?
    };
    Ok(json)
}
