//! End-to-end CLI tests for turnpack.
//!
//! These tests verify the complete CLI workflow by running the actual binary
//! with various arguments and checking the output.
//!
//! # Test Categories
//!
//! - **Basic functionality**: Both input layouts work via CLI
//! - **Output formats**: CSV, JSON, JSONL, XLSX generation
//! - **Options**: Turn cap, delimiter, pretty printing, date filter
//! - **Environment**: Options read from environment variables
//! - **Error handling**: Proper error messages for bad input
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Creates a temporary directory with test exports.
fn setup_fixtures() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");

    // JSON Lines export, one noisy line
    let jsonl = r#"{"_id": {"$oid": "aaa"}, "usuario_id": "u1", "createdAt": {"$date": "2024-01-10T09:00:00Z"}, "messages": [{"role": "system", "content": "Eres un tutor"}, {"role": "user", "content": "hola"}, {"role": "assistant", "content": "¿en qué te ayudo?"}, {"role": "user", "content": "derivadas"}, {"role": "assistant", "content": "claro"}]}
{"_id": {"$oid": "bbb"}, "usuario_id": "u2", "createdAt": {"$date": "2024-06-15T09:00:00Z"}, "data": {"chat": [{"sender": "alumno", "text": "¿π?"}, {"sender": "tutor", "text": "3.14159"}]}}
not json at all
{"_id": {"$oid": "ccc"}, "createdAt": "2024-09-01T12:00:00Z", "input": "2+2?", "output": "4"}
"#;
    fs::write(dir.path().join("interacciones.jsonl"), jsonl).unwrap();

    // JSON array export
    let array = r#"[
  {"_id": 1, "history": [{"author": "human", "message": "primera"}, {"author": "ai", "message": "segunda"}]},
  {"_id": 2, "turns": [{"from": "user", "text": "sin respuesta"}]}
]"#;
    fs::write(dir.path().join("interacciones.json"), array).unwrap();

    // JSON Lines behind an unhelpful extension
    let disguised = "{\"_id\": \"x\", \"chat\": [{\"role\": \"user\", \"content\": \"oculto\"}]}\n";
    fs::write(dir.path().join("dump.txt"), disguised).unwrap();

    fs::write(dir.path().join("empty.jsonl"), "").unwrap();
    fs::write(dir.path().join("blank.jsonl"), "\n\n   \n").unwrap();
    fs::write(dir.path().join("broken.json"), "[{\"_id\": 1},").unwrap();

    dir
}

fn turnpack_cmd() -> Command {
    let cmd = std::process::Command::new(env!("CARGO_BIN_EXE_turnpack"));
    let mut cmd = Command::from_std(cmd);
    for var in [
        "OUTPUT_PATH",
        "OUTPUT_FORMAT",
        "INPUT_FORMAT",
        "MAX_TURNOS",
        "DATE_FIELD",
        "START_DATE",
        "END_DATE",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn input_path(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_str().unwrap().to_string()
}

fn output_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

// ============================================================================
// Basic Functionality
// ============================================================================

mod basic {
    use super::*;

    #[test]
    fn test_jsonl_to_csv() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.csv");

        turnpack_cmd()
            .args([
                input_path(&fixtures, "interacciones.jsonl").as_str(),
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("✅ Done!"))
            .stdout(predicate::str::contains("Records:   3"));

        let content = fs::read_to_string(&output).unwrap();
        let header = content.lines().next().unwrap();
        assert!(header.starts_with("interaccion_id;usuario_id;"));
        assert!(header.ends_with(";U1;A1;U2;A2"));
        assert!(content.contains("aaa;u1;"));
        assert!(content.contains(";hola;¿en qué te ayudo?;derivadas;claro"));
        assert!(content.contains("fallback_from_fields;2+2?;4;;"));
        assert!(!content.contains("Eres un tutor"));
    }

    #[test]
    fn test_json_array_input() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.csv");

        turnpack_cmd()
            .args([
                input_path(&fixtures, "interacciones.json").as_str(),
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Reading JSON..."));

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains(";history;primera;segunda"));
        assert!(content.contains(";turns;sin respuesta;"));
    }

    #[test]
    fn test_content_detection() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.csv");

        turnpack_cmd()
            .args([input_path(&fixtures, "dump.txt").as_str(), "-o", output.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Reading JSONL..."));

        assert!(fs::read_to_string(&output).unwrap().contains("oculto"));
    }

    #[test]
    fn test_input_format_override() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.csv");

        // Forcing whole-document JSON on a JSON Lines file cannot parse
        turnpack_cmd()
            .args([
                input_path(&fixtures, "interacciones.jsonl").as_str(),
                "--input-format",
                "json",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to parse JSON"));
    }
}

// ============================================================================
// Output Format Tests
// ============================================================================

mod output_formats {
    use super::*;

    #[test]
    fn test_output_json() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.json");

        turnpack_cmd()
            .args([
                input_path(&fixtures, "interacciones.jsonl").as_str(),
                "-f",
                "json",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["interaccion_id"], "aaa");
        assert_eq!(rows[0]["num_turnos_user_assistant"], 2);
        assert_eq!(rows[1]["ruta_mensajes"], "data.chat");
        assert!(rows[2]["usuario_id"].is_null());
    }

    #[test]
    fn test_output_json_pretty() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.json");

        turnpack_cmd()
            .args([
                input_path(&fixtures, "interacciones.jsonl").as_str(),
                "--format",
                "json",
                "--pretty",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.starts_with("[\n  {"));
    }

    #[test]
    fn test_output_jsonl() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.jsonl");

        turnpack_cmd()
            .args([
                input_path(&fixtures, "interacciones.jsonl").as_str(),
                "-f",
                "ndjson",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 3);
        for line in content.lines() {
            let row: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(row.get("U2").is_some());
        }
    }

    #[test]
    fn test_output_xlsx() {
        use calamine::{Data, Reader, Xlsx, open_workbook};

        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.xlsx");

        turnpack_cmd()
            .args([
                input_path(&fixtures, "interacciones.jsonl").as_str(),
                "-f",
                "xlsx",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("XLSX"));

        let mut workbook: Xlsx<_> = open_workbook(&output).unwrap();
        let range = workbook.worksheet_range("Tabla_Conversacion").unwrap();
        assert_eq!(range.get((0, 8)), Some(&Data::String("U1".into())));
        assert_eq!(range.get_size().0, 4);
    }

    #[test]
    fn test_default_output_filename() {
        let fixtures = setup_fixtures();
        let input = input_path(&fixtures, "interacciones.jsonl");
        let workdir = tempdir().unwrap();

        turnpack_cmd()
            .current_dir(workdir.path())
            .args([input.as_str(), "-f", "jsonl"])
            .assert()
            .success()
            .stdout(predicate::str::contains("interacciones_tabla_"));

        let names: Vec<String> = fs::read_dir(workdir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("interacciones_tabla_"));
        assert!(names[0].ends_with(".jsonl"));
    }

    #[test]
    fn test_custom_delimiter() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.csv");

        turnpack_cmd()
            .args([
                input_path(&fixtures, "interacciones.json").as_str(),
                "--delimiter",
                ",",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.starts_with("interaccion_id,usuario_id,"));
    }
}

// ============================================================================
// Options
// ============================================================================

mod options {
    use super::*;

    #[test]
    fn test_max_turns() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.csv");

        turnpack_cmd()
            .args([
                input_path(&fixtures, "interacciones.jsonl").as_str(),
                "--max-turns",
                "1",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("up to 1"));

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.lines().next().unwrap().ends_with(";U1;A1"));
        assert!(!content.contains("derivadas"));
    }

    #[test]
    fn test_date_range() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.csv");

        turnpack_cmd()
            .args([
                input_path(&fixtures, "interacciones.jsonl").as_str(),
                "--date-field",
                "createdAt",
                "--start-date",
                "2024-03-01",
                "--end-date",
                "2024-07-01",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("kept 1"));

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("bbb"));
        assert!(!content.contains("aaa"));
        assert!(!content.contains("ccc"));
    }

    #[test]
    fn test_bounds_without_field_are_ignored() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.csv");

        turnpack_cmd()
            .args([
                input_path(&fixtures, "interacciones.jsonl").as_str(),
                "--start-date",
                "2030-01-01",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Date bounds ignored"))
            .stdout(predicate::str::contains("kept 3"));
    }

    #[test]
    fn test_strict_fails_on_garbage_line() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.csv");

        turnpack_cmd()
            .args([
                input_path(&fixtures, "interacciones.jsonl").as_str(),
                "--strict",
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("❌ Error:"))
            .stderr(predicate::str::contains("JSON Lines"));
    }

    #[test]
    fn test_garbage_line_warning_on_stderr() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.csv");

        turnpack_cmd()
            .env("RUST_LOG", "warn")
            .args([
                input_path(&fixtures, "interacciones.jsonl").as_str(),
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stderr(predicate::str::contains("skipping malformed record"));
    }
}

// ============================================================================
// Environment Variables
// ============================================================================

mod environment {
    use super::*;

    #[test]
    fn test_env_configuration() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "desde_env.jsonl");

        turnpack_cmd()
            .env("OUTPUT_PATH", output.to_str().unwrap())
            .env("OUTPUT_FORMAT", "jsonl")
            .env("MAX_TURNOS", "1")
            .env("DATE_FIELD", "createdAt")
            .env("END_DATE", "2024-07-01")
            .arg(input_path(&fixtures, "interacciones.jsonl"))
            .assert()
            .success();

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(!content.contains("\"U2\""));
    }

    #[test]
    fn test_blank_env_values_are_unset() {
        let fixtures = setup_fixtures();
        let output = output_path(&fixtures, "tabla.csv");

        turnpack_cmd()
            .env("DATE_FIELD", "")
            .env("START_DATE", "  ")
            .args([
                input_path(&fixtures, "interacciones.jsonl").as_str(),
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("kept 3"));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

mod errors {
    use super::*;

    #[test]
    fn test_missing_input_file() {
        turnpack_cmd()
            .arg("/nonexistent/interacciones.jsonl")
            .assert()
            .failure()
            .stderr(predicate::str::contains("❌ Error:"))
            .stderr(predicate::str::contains("IO error"));
    }

    #[test]
    fn test_empty_export_is_no_records() {
        let fixtures = setup_fixtures();

        for name in ["empty.jsonl", "blank.jsonl"] {
            turnpack_cmd()
                .args([input_path(&fixtures, name).as_str(), "-o", "/dev/null"])
                .assert()
                .failure()
                .stderr(predicate::str::contains("No records found to export"));
        }
    }

    #[test]
    fn test_broken_json() {
        let fixtures = setup_fixtures();

        turnpack_cmd()
            .args([input_path(&fixtures, "broken.json").as_str(), "-o", "/dev/null"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to parse JSON"));
    }

    #[test]
    fn test_invalid_date() {
        let fixtures = setup_fixtures();

        turnpack_cmd()
            .args([
                input_path(&fixtures, "interacciones.jsonl").as_str(),
                "--date-field",
                "createdAt",
                "--start-date",
                "el martes",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid date 'el martes'"));
    }

    #[test]
    fn test_invalid_format_value() {
        turnpack_cmd()
            .args(["x.jsonl", "-f", "xls"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid value 'xls'"));
    }

    #[test]
    fn test_missing_input_argument() {
        turnpack_cmd()
            .assert()
            .failure()
            .stderr(predicate::str::contains("<INPUT>"));
    }
}

// ============================================================================
// Help and Version
// ============================================================================

mod help {
    use super::*;

    #[test]
    fn test_help() {
        turnpack_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("EXAMPLES:"))
            .stdout(predicate::str::contains("--max-turns"))
            .stdout(predicate::str::contains("MAX_TURNOS"));
    }

    #[test]
    fn test_version() {
        turnpack_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}
