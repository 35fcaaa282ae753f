//! Excel workbook writer.

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde_json::Value;
use tracing::warn;

use crate::core::report::Report;
use crate::error::Result;

/// Name of the single worksheet holding the wide table.
pub const SHEET_NAME: &str = "Tabla_Conversacion";

/// Rows (header included) scanned when sizing columns.
const AUTOFIT_SCAN_ROWS: usize = 2000;

/// Widest a column is sized to, in characters.
const MAX_COLUMN_WIDTH: usize = 80;

/// Width assumed for a column with an empty header.
const EMPTY_HEADER_WIDTH: usize = 10;

/// Longest text a cell accepts.
const MAX_CELL_CHARS: usize = 32_767;

/// Writes the wide table to an `.xlsx` workbook.
///
/// # Format
/// - One sheet, [`SHEET_NAME`], with a bold header row frozen in place
/// - Counts are numeric cells, missing metadata is left blank
/// - Column widths fit the header and the first rows, capped at 80 characters
pub fn write_xlsx(report: &Report, output_path: &str) -> Result<()> {
    let mut workbook = build_workbook(report)?;
    workbook.save(output_path)?;
    Ok(())
}

/// Renders the wide table as `.xlsx` bytes.
pub fn to_xlsx_bytes(report: &Report) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(report)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(report: &Report) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    fill_worksheet(report, workbook.add_worksheet())?;
    Ok(workbook)
}

fn fill_worksheet(report: &Report, worksheet: &mut Worksheet) -> Result<()> {
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, name) in report.header().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &bold)?;
    }

    for (i, row) in report.row_objects().iter().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, value) in row.values().enumerate() {
            let col = col as u16;
            match value {
                Value::Number(n) => {
                    if let Some(n) = n.as_f64() {
                        worksheet.write_number(row_num, col, n)?;
                    }
                }
                Value::String(s) if !s.is_empty() => {
                    worksheet.write_string(row_num, col, fit_cell(s, row_num))?;
                }
                _ => {}
            }
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    for (col, width) in column_widths(report).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }
    Ok(())
}

/// Cuts text to the cell limit.
fn fit_cell(text: &str, row: u32) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            warn!(row, chars = text.chars().count(), "cell text truncated to fit the sheet");
            &text[..cut]
        }
        None => text,
    }
}

/// Column widths in characters: the longest of the header and the scanned
/// cells, plus two, capped at [`MAX_COLUMN_WIDTH`].
fn column_widths(report: &Report) -> Vec<usize> {
    let mut widths: Vec<usize> = report
        .header()
        .iter()
        .map(|name| {
            if name.is_empty() {
                EMPTY_HEADER_WIDTH
            } else {
                name.chars().count()
            }
        })
        .collect();

    for row in report.rows().iter().take(AUTOFIT_SCAN_ROWS - 1) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    widths
        .into_iter()
        .map(|w| (w + 2).min(MAX_COLUMN_WIDTH))
        .collect()
}
