//! End-to-end pipeline tests.
//!
//! Tests verify the full pipeline: source → lex → parse → evaluate → report,
//! including partial evaluation after parse errors, diagnostics rendering,
//! the JSON report shape, file input, and determinism.

use milo::{parse_source, run_file, run_source, RunOptions, RunReport};
use pretty_assertions::assert_eq;
use serde_json::Value;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn run(source: &str) -> RunReport {
    run_source("test.milo", source, &RunOptions::default())
}

fn run_strict(source: &str) -> RunReport {
    let options = RunOptions {
        evaluate_on_parse_error: false,
    };
    run_source("test.milo", source, &options)
}

fn json(report: &RunReport) -> Value {
    serde_json::to_value(report).expect("report serializes")
}

/// Canonical rendering of a program that must parse cleanly.
fn render(source: &str) -> String {
    let parsed = parse_source("test.milo", source);
    assert!(parsed.is_ok(), "parse errors: {:?}", parsed.errors.errors);
    parsed.program.to_string()
}

// ══════════════════════════════════════════════════════════════════════════════
// Successful runs
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_simple_program() {
    let report = run("let a = 5; let b = a + 1; print(b);");
    assert!(report.success);
    assert!(report.evaluated);
    assert_eq!(report.output, vec!["6"]);
    assert_eq!(report.bindings["a"].kind, "NUMBER");
    assert_eq!(report.bindings["a"].value, "5");
    assert_eq!(report.bindings["b"].value, "6");
    assert!(report.diagnostics().is_empty());
}

#[test]
fn test_shared_number_in_report() {
    let report = run("let a = 5; let b = a; ++a;");
    assert_eq!(report.bindings["b"].value, "6");
    assert_eq!(report.output, vec!["6"]);
}

#[test]
fn test_bindings_of_every_type() {
    let report = run("let n = 1.5; let s = \"hi\"; let t = true; let f = fn() { }; let z = print(0);");
    let kinds: Vec<(&str, &str)> = report
        .bindings
        .iter()
        .map(|(name, b)| (name.as_str(), b.kind.as_str()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("f", "FUNC"),
            ("n", "NUMBER"),
            ("s", "STRING"),
            ("t", "BOOLEAN"),
            ("z", "NULL"),
        ]
    );
    assert_eq!(report.bindings["f"].value, "function");
    assert_eq!(report.bindings["z"].value, "null");
}

#[test]
fn test_multiline_script_with_comments() {
    let source = "\
// compute a few things
let width = 4;
let height = 2.5;
let area = width * height;
print(area);
area > 9;
";
    let report = run(source);
    assert!(report.success);
    assert_eq!(report.output, vec!["10", "true"]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Parse errors
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_statements_before_parse_error_still_run() {
    let report = run("let a = 1; print(a); let = 2; print(3);");
    assert!(!report.success);
    assert!(report.evaluated);
    assert_eq!(report.parse_errors.total_errors, 1);
    assert_eq!(report.output, vec!["1"]);
    assert!(report.bindings.contains_key("a"));
}

#[test]
fn test_strict_mode_skips_evaluation() {
    let report = run_strict("let a = 1; print(a); let = 2;");
    assert!(!report.evaluated);
    assert!(report.output.is_empty());
    assert!(report.bindings.is_empty());
    assert_eq!(report.parse_errors.total_errors, 1);
}

#[test]
fn test_strict_mode_runs_clean_programs() {
    let report = run_strict("print(1);");
    assert!(report.evaluated);
    assert_eq!(report.output, vec!["1"]);
}

#[test]
fn test_parse_diagnostic_rendering() {
    let report = run("let = 5;");
    assert_eq!(
        report.diagnostics(),
        vec!["test.milo:1:5: parse error: expected IDENT, found '='\n    let = 5;"]
    );
}

#[test]
fn test_unclosed_block_diagnostic_has_help() {
    let report = run("let f = fn(x) {\n  x");
    let diagnostics = report.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(
        diagnostics[0].ends_with("help: add '}' to close the block opened at 1:15"),
        "got: {}",
        diagnostics[0]
    );
}

#[test]
fn test_illegal_character_is_a_scan_error() {
    let report = run("let a = 1 $ 2;");
    assert_eq!(report.parse_errors.errors[0].message, "expected ';', found ILLEGAL '$'");
    assert_eq!(json(&report)["parse_errors"]["errors"][0]["category"], "scan");
}

// ══════════════════════════════════════════════════════════════════════════════
// Runtime errors
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_runtime_errors_reported_per_statement() {
    let report = run("let a = 1;\nb;\nfoo(1, 2);\nprint(a);");
    assert!(!report.success);
    assert_eq!(report.output, vec!["1"]);
    let statements: Vec<usize> = report.runtime_errors.iter().map(|e| e.statement).collect();
    assert_eq!(statements, vec![1, 2]);
    assert_eq!(
        report.diagnostics(),
        vec![
            "test.milo:2:1: runtime error: invalid reference: b is nil",
            "test.milo:3:1: runtime error: unknown function: foo",
        ]
    );
}

#[test]
fn test_parse_and_runtime_errors_together() {
    let report = run("x; let 5");
    assert_eq!(report.parse_errors.total_errors, 1);
    assert_eq!(report.runtime_errors.len(), 1);
    assert_eq!(report.diagnostics().len(), 2);
    assert!(report.diagnostics()[1].contains("invalid reference: x is nil"));
}

// ══════════════════════════════════════════════════════════════════════════════
// JSON report
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_json_report_shape() {
    let report = run("let a = 2; a * 3; missing;");
    let value = json(&report);
    assert_eq!(value["file"], "test.milo");
    assert_eq!(value["success"], false);
    assert_eq!(value["evaluated"], true);
    assert_eq!(value["output"][0], "6");
    assert_eq!(value["parse_errors"]["total_errors"], 0);
    assert_eq!(value["bindings"]["a"]["type"], "NUMBER");
    assert_eq!(value["bindings"]["a"]["value"], "2");
    let err = &value["runtime_errors"][0];
    assert_eq!(err["statement"], 2);
    assert_eq!(err["line"], 1);
    assert_eq!(err["column"], 19);
    assert_eq!(err["message"], "invalid reference: missing is nil");
}

#[test]
fn test_to_json_is_pretty_and_parseable() {
    let report = run("print(\"hi\");");
    let text = report.to_json().expect("serializes");
    assert!(text.contains('\n'));
    let back: Value = serde_json::from_str(&text).expect("valid JSON");
    assert_eq!(back["output"][0], "hi");
}

// ══════════════════════════════════════════════════════════════════════════════
// Rendering properties
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_canonical_renderings() {
    assert_eq!(render("(5 + 3) * 5"), "((5 + 3) * 5)");
    assert_eq!(render("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(render("1 - 2 - 3"), "((1 - 2) - 3)");
    assert_eq!(
        render("if (5 == 5) { true } else { false }"),
        "if ((5 == 5)) { true } else { false }"
    );
}

#[test]
fn test_render_round_trip() {
    let source = "let a = fn(x, y) { let z = x * -y; return z; }; print(a); if (a < 2) { a } else { !b }";
    let once = render(source);
    assert_eq!(render(&once), once);
}

// ══════════════════════════════════════════════════════════════════════════════
// Files & determinism
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_run_file() {
    let path = std::env::temp_dir().join(format!("milo-pipeline-{}.milo", std::process::id()));
    std::fs::write(&path, "let greeting = \"hello\";\nprint(greeting);\n").expect("write script");
    let report = run_file(&path, &RunOptions::default()).expect("file runs");
    std::fs::remove_file(&path).ok();
    assert_eq!(report.file, path.display().to_string());
    assert_eq!(report.output, vec!["hello"]);
}

#[test]
fn test_pipeline_determinism_100_iterations() {
    let source = "let a = 5; let b = a; ++a; print(b / 3); c; let d = fn(x) { x }; d(1);";
    let first = json(&run(source));
    for i in 0..100 {
        assert_eq!(first, json(&run(source)), "Determinism failure at iteration {i}");
    }
}
