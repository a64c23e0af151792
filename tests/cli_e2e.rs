//! End-to-end tests for the kalu-reports binary.
//!
//! These drive the built binary against stored-result fixtures and check
//! the artifact files, stdout, and exit codes. PDF stays out of the happy
//! paths so the tests never depend on an installed converter.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const SUMMARY_RESULT: &str = r#"{"resumo": {"titulo": "X", "items": ["a", "b"]}}"#;

const COMPETITOR_RESULT: &str = r#"{
    "analise_concorrentes": {
        "mercado": "Luanda",
        "concorrentes_locais": [
            {"nome": "Alfa", "tipo": "Estúdio", "diferencial": "Preço"}
        ],
        "conclusao": "Mercado em crescimento"
    }
}"#;

// Helper to run the binary with arguments
fn run_kalu(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kalu-reports"))
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run kalu-reports {}: {}", args.join(" "), e))
}

// Helper to run the binary feeding the result text through stdin
fn run_kalu_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_kalu-reports"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn kalu-reports");
    child.stdin.take().expect("stdin piped").write_all(input.as_bytes()).expect("write stdin");
    child.wait_with_output().expect("wait for kalu-reports")
}

// Helper to find the one artifact with the given extension
fn artifact_with_extension(dir: &Path, ext: &str) -> PathBuf {
    std::fs::read_dir(dir)
        .expect("read output dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|e| e.to_str()) == Some(ext))
        .unwrap_or_else(|| panic!("no .{} artifact in {:?}", ext, dir))
}

#[test]
fn test_generates_requested_artifacts_from_file_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("result.json");
    std::fs::write(&input, SUMMARY_RESULT).unwrap();
    let out_dir = dir.path().join("artifacts");

    let output = run_kalu(&[
        input.to_str().unwrap(),
        "--title",
        "Relatório Semanal",
        "--task-id",
        "12",
        "--output-dir",
        out_dir.to_str().unwrap(),
        "--formats",
        "markdown",
        "html",
        "docx",
        "xlsx",
    ]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("report saved to:"), "got: {}", stdout);

    for ext in ["md", "html", "docx", "xlsx"] {
        let path = artifact_with_extension(&out_dir, ext);
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("task_12_"), "got: {}", name);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    let markdown = std::fs::read_to_string(artifact_with_extension(&out_dir, "md")).unwrap();
    assert!(markdown.starts_with("# Relatório Semanal"));
    assert!(markdown.contains("## Resumo"));
    assert!(markdown.contains("- **Titulo:** X"));
    assert!(markdown.contains("- a"));

    let html = std::fs::read_to_string(artifact_with_extension(&out_dir, "html")).unwrap();
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("<h1>Relatório Semanal</h1>"));
    assert!(html.contains("<li>a</li>"));
}

#[test]
fn test_raw_text_input_still_produces_a_full_report() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("artifacts");

    let output = run_kalu_with_stdin(
        &[
            "--title",
            "Nota Rápida",
            "--output-dir",
            out_dir.to_str().unwrap(),
            "--formats",
            "markdown",
        ],
        "apenas texto\nsem json",
    );

    assert!(output.status.success());
    let markdown = std::fs::read_to_string(artifact_with_extension(&out_dir, "md")).unwrap();
    assert!(markdown.contains("## Resultado"));
    assert!(markdown.contains("apenas texto\nsem json"));
    assert!(markdown.contains("*Relatório gerado automaticamente por Kalu AI Assistant*"));
}

#[test]
fn test_competitor_analysis_uses_the_specialized_layout() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("artifacts");

    let output = run_kalu_with_stdin(
        &[
            "--title",
            "Análise de Mercado",
            "--output-dir",
            out_dir.to_str().unwrap(),
            "--formats",
            "markdown",
        ],
        COMPETITOR_RESULT,
    );

    assert!(output.status.success());
    let markdown = std::fs::read_to_string(artifact_with_extension(&out_dir, "md")).unwrap();
    assert!(markdown.contains("## 📊 Informações Gerais"));
    assert!(markdown.contains("- **Mercado:** Luanda"));
    assert!(markdown.contains("## 🏢 Concorrentes Locais"));
    assert!(markdown.contains("### Alfa"));
    assert!(markdown.contains("## 🎯 Conclusão"));
}

#[test]
fn test_content_only_prints_the_html_fragment() {
    let output = run_kalu_with_stdin(
        &["--title", "Report", "--content-only", "--formats", "html"],
        SUMMARY_RESULT,
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<h1>Report</h1>"), "got: {}", stdout);
    assert!(stdout.contains("<h2>Resumo</h2>"));
    assert!(stdout.contains("<li>a</li>"));
    assert!(!stdout.contains("<!DOCTYPE html>"));
}

#[test]
fn test_content_only_with_other_formats_is_rejected() {
    let output = run_kalu_with_stdin(
        &["--title", "Report", "--content-only", "--formats", "markdown"],
        SUMMARY_RESULT,
    );

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--content-only"), "got: {}", stdout);
}

#[test]
fn test_missing_input_file_exits_with_an_error() {
    let output = run_kalu(&["/definitely/not/here/result.json", "--title", "Report"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("not found"), "got: {}", stdout);
}

#[test]
fn test_json_flag_prints_the_path_map() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("artifacts");

    let output = run_kalu_with_stdin(
        &[
            "--title",
            "Report",
            "--output-dir",
            out_dir.to_str().unwrap(),
            "--formats",
            "markdown",
            "--json",
        ],
        SUMMARY_RESULT,
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let map: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    let markdown_path = map["markdown"].as_str().expect("markdown path present");
    assert!(Path::new(markdown_path).exists());
    assert!(map.get("pdf").is_none());
}

#[cfg(not(feature = "pdf-fallback"))]
#[test]
fn test_partial_failure_exits_with_code_two() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("artifacts");

    let output = run_kalu_with_stdin(
        &[
            "--title",
            "Report",
            "--output-dir",
            out_dir.to_str().unwrap(),
            "--formats",
            "markdown",
            "pdf",
            "--pdf-program",
            "kalu-missing-e2e-converter",
        ],
        SUMMARY_RESULT,
    );

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 of 2 formats failed"), "got: {}", stderr);
    // the markdown artifact was still produced
    artifact_with_extension(&out_dir, "md");
}
