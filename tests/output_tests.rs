//! Tests for output writers (CSV, JSON, JSONL, XLSX)

use serde_json::{Value, json};
use std::fs;
use tempfile::tempdir;

use turnpack::config::ExportConfig;
use turnpack::core::output::{
    SHEET_NAME, to_csv, to_json, to_jsonl, to_xlsx_bytes, write_csv, write_json, write_jsonl,
    write_xlsx,
};
use turnpack::core::{OutputConfig, Report};
use turnpack::format::{OutputFormat, to_format_string};

/// Two interactions of different widths, with delimiter and newline traps.
fn sample_report() -> Report {
    Report::build(
        vec![
            json!({
                "_id": {"$oid": "65a1f0c2e4b0a1b2c3d4e5f6"},
                "usuario_id": "u;1",
                "inicio": {"$date": "2024-01-15T10:30:00Z"},
                "messages": [
                    {"role": "user", "content": "línea uno"},
                    {"role": "user", "content": "línea \"dos\""},
                    {"role": "assistant", "content": "a; b; c"},
                    {"role": "user", "content": "¿y?"},
                    {"role": "assistant", "content": "listo 👍"}
                ]
            }),
            json!({"_id": "b", "input": "2+2?", "output": "4"}),
        ],
        &ExportConfig::default(),
    )
    .unwrap()
}

// ============================================================================
// CSV Writer Tests
// ============================================================================

mod csv_writer_tests {
    use super::*;

    fn read_back(content: &str, delimiter: u8) -> (csv::StringRecord, Vec<csv::StringRecord>) {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .from_reader(content.as_bytes());
        let headers = reader.headers().unwrap().clone();
        let rows = reader.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn test_header_line() {
        let csv = to_csv(&sample_report(), &OutputConfig::new()).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "interaccion_id;usuario_id;ejercicio_id;inicio;fin;num_turnos_user_assistant;num_mensajes_raw;ruta_mensajes;U1;A1;U2;A2"
        );
    }

    #[test]
    fn test_special_characters_survive() {
        let csv = to_csv(&sample_report(), &OutputConfig::new()).unwrap();
        let (_, rows) = read_back(&csv, b';');

        assert_eq!(&rows[0][1], "u;1");
        assert_eq!(&rows[0][8], "línea uno\nlínea \"dos\"");
        assert_eq!(&rows[0][9], "a; b; c");
        assert_eq!(&rows[0][11], "listo 👍");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let csv = to_csv(&sample_report(), &OutputConfig::new()).unwrap();
        let (headers, rows) = read_back(&csv, b';');

        assert_eq!(rows[1].len(), headers.len());
        assert_eq!(&rows[1][8], "2+2?");
        assert_eq!(&rows[1][9], "4");
        assert_eq!(&rows[1][10], "");
        assert_eq!(&rows[1][11], "");
    }

    #[test]
    fn test_missing_metadata_is_empty_cell() {
        let csv = to_csv(&sample_report(), &OutputConfig::new()).unwrap();
        let (_, rows) = read_back(&csv, b';');
        assert_eq!(&rows[1][1], "");
        assert_eq!(&rows[1][3], "");
    }

    #[test]
    fn test_custom_delimiter() {
        let config = OutputConfig::new().with_delimiter(b'\t');
        let csv = to_csv(&sample_report(), &config).unwrap();
        assert!(csv.lines().next().unwrap().starts_with("interaccion_id\tusuario_id\t"));

        let (_, rows) = read_back(&csv, b'\t');
        assert_eq!(&rows[0][1], "u;1");
    }

    #[test]
    fn test_write_csv_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tabla.csv");
        fs::write(&path, "stale content that is longer than nothing").unwrap();

        write_csv(&sample_report(), path.to_str().unwrap(), &OutputConfig::new()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("interaccion_id;"));
        assert!(!content.contains("stale"));
    }

    #[test]
    fn test_write_csv_bad_path() {
        let err = write_csv(
            &sample_report(),
            "/nonexistent/dir/tabla.csv",
            &OutputConfig::new(),
        )
        .unwrap_err();
        assert!(err.is_io());
    }
}

// ============================================================================
// JSON Writer Tests
// ============================================================================

mod json_writer_tests {
    use super::*;

    #[test]
    fn test_keys_follow_column_order() {
        let report = sample_report();
        let json = to_json(&report, &OutputConfig::new()).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();

        let keys: Vec<&String> = parsed[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, report.header().iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_types() {
        let json = to_json(&sample_report(), &OutputConfig::new()).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed[0]["num_turnos_user_assistant"], 2);
        assert_eq!(parsed[0]["num_mensajes_raw"], 5);
        assert_eq!(parsed[0]["inicio"], "2024-01-15T10:30:00+00:00");
        assert!(parsed[1]["usuario_id"].is_null());
        assert_eq!(parsed[1]["U2"], "");
    }

    #[test]
    fn test_write_json_pretty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tabla.json");

        write_json(
            &sample_report(),
            path.to_str().unwrap(),
            &OutputConfig::new().with_pretty(),
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n  {\n"));
        let parsed: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }
}

// ============================================================================
// JSONL Writer Tests
// ============================================================================

mod jsonl_writer_tests {
    use super::*;

    #[test]
    fn test_one_object_per_line() {
        let jsonl = to_jsonl(&sample_report()).unwrap();
        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 2);

        for line in lines {
            let row: Value = serde_json::from_str(line).unwrap();
            assert!(row.is_object());
        }
    }

    #[test]
    fn test_multiline_content_stays_on_one_line() {
        let jsonl = to_jsonl(&sample_report()).unwrap();
        let first: Value = serde_json::from_str(jsonl.lines().next().unwrap()).unwrap();
        assert_eq!(first["U1"], "línea uno\nlínea \"dos\"");
    }

    #[test]
    fn test_write_jsonl_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tabla.jsonl");
        write_jsonl(&sample_report(), path.to_str().unwrap()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, to_jsonl(&sample_report()).unwrap());
    }
}

// ============================================================================
// XLSX Writer Tests
// ============================================================================

mod xlsx_writer_tests {
    use super::*;
    use calamine::{Data, Range, Reader, Xlsx};
    use std::io::Cursor;

    fn read_sheet(bytes: Vec<u8>) -> (Vec<String>, Range<Data>) {
        let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
        let names = workbook.sheet_names();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        (names, range)
    }

    fn text(value: &str) -> Data {
        Data::String(value.to_string())
    }

    #[test]
    fn test_single_named_sheet() {
        let (names, _) = read_sheet(to_xlsx_bytes(&sample_report()).unwrap());
        assert_eq!(names, vec!["Tabla_Conversacion".to_string()]);
    }

    #[test]
    fn test_header_and_turn_cells() {
        let (_, range) = read_sheet(to_xlsx_bytes(&sample_report()).unwrap());
        assert_eq!(range.get_size(), (3, 12));

        let header: Vec<&Data> = range.rows().next().unwrap().iter().collect();
        assert_eq!(header[0], &text("interaccion_id"));
        assert_eq!(header[10], &text("U2"));
        assert_eq!(header[11], &text("A2"));

        assert_eq!(range.get((1, 8)), Some(&text("línea uno\nlínea \"dos\"")));
        assert_eq!(range.get((1, 9)), Some(&text("a; b; c")));
        assert_eq!(range.get((1, 11)), Some(&text("listo 👍")));
        assert_eq!(range.get((2, 8)), Some(&text("2+2?")));
        assert_eq!(range.get((2, 9)), Some(&text("4")));
    }

    #[test]
    fn test_counts_are_numbers_and_gaps_are_blank() {
        let (_, range) = read_sheet(to_xlsx_bytes(&sample_report()).unwrap());
        assert_eq!(range.get((1, 5)), Some(&Data::Float(2.0)));
        assert_eq!(range.get((1, 6)), Some(&Data::Float(5.0)));
        assert_eq!(range.get((2, 1)), Some(&Data::Empty));
        assert_eq!(range.get((2, 10)), Some(&Data::Empty));
    }

    #[test]
    fn test_oversized_cell_is_truncated() {
        let report = Report::build(
            vec![json!({"input": "q", "output": "z".repeat(40_000)})],
            &ExportConfig::default(),
        )
        .unwrap();
        let (_, range) = read_sheet(to_xlsx_bytes(&report).unwrap());
        match range.get((1, 9)) {
            Some(Data::String(s)) => assert_eq!(s.chars().count(), 32_767),
            other => panic!("unexpected cell: {other:?}"),
        }
    }

    #[test]
    fn test_write_xlsx_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tabla.xlsx");
        write_xlsx(&sample_report(), path.to_str().unwrap()).unwrap();

        let (_, range) = read_sheet(fs::read(&path).unwrap());
        assert_eq!(range.get((2, 0)), Some(&text("b")));
    }

    #[test]
    fn test_write_xlsx_bad_path() {
        let result = write_xlsx(&sample_report(), "/nonexistent/dir/tabla.xlsx");
        assert!(result.is_err());
    }
}

// ============================================================================
// Cross-format consistency
// ============================================================================

#[test]
fn test_formats_agree_on_cells() {
    let report = sample_report();
    let config = OutputConfig::new();

    let csv = to_format_string(&report, OutputFormat::Csv, &config).unwrap();
    let json = to_format_string(&report, OutputFormat::Json, &config).unwrap();
    let jsonl = to_format_string(&report, OutputFormat::Jsonl, &config).unwrap();

    let json_rows: Vec<Value> = serde_json::from_str(&json).unwrap();
    let jsonl_rows: Vec<Value> = jsonl
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(json_rows, jsonl_rows);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(csv.as_bytes());
    for (record, row) in reader.records().zip(&json_rows) {
        let record = record.unwrap();
        assert_eq!(&record[8], row["U1"].as_str().unwrap());
        assert_eq!(&record[9], row["A1"].as_str().unwrap());
    }
}
