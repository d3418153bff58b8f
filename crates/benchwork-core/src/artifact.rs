//! Report persistence and rendering.
//!
//! `save_report`/`load_report` round-trip a [`BenchmarkReport`] through
//! pretty JSON field-for-field; `render_report_md` produces the
//! human-readable summary artifact for PR comments and log attachments.

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::report::BenchmarkReport;

/// Write a report as pretty JSON with every field preserved.
pub fn save_report(path: &Path, report: &BenchmarkReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report).context("serialize benchmark report")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Read a report back from JSON.
///
/// Loading the file produced by [`save_report`] reconstructs the report
/// field-for-field.
pub fn load_report(path: &Path) -> Result<BenchmarkReport> {
    let content = std::fs::read_to_string(path).with_context(|| format!("read {:?}", path))?;
    let report = serde_json::from_str(&content).context("parse benchmark report")?;
    Ok(report)
}

/// Render a Markdown summary for a report.
pub fn render_report_md(report: &BenchmarkReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# Benchmark Report: {}\n\n",
        report.benchmark_name
    ));
    out.push_str(&format!("- subject: {}\n", report.subject_name));
    out.push_str(&format!(
        "- items: {} ({} correct)\n",
        report.total_items, report.correct_count
    ));
    out.push_str(&format!("- accuracy: {:.2}%\n", report.accuracy * 100.0));
    out.push_str(&format!(
        "- execution time: {:.2}s\n",
        report.execution_time
    ));
    out.push_str(&format!("- timestamp: {}\n", report.timestamp));

    let incorrect: Vec<_> = report
        .detailed_results
        .iter()
        .filter(|outcome| !outcome.correct)
        .collect();

    if !incorrect.is_empty() {
        out.push_str("\n## Incorrect Items\n\n");
        for outcome in incorrect {
            match &outcome.error {
                Some(error) => out.push_str(&format!(
                    "- item {}: score {}/{} (error: {})\n",
                    outcome.item_id, outcome.score, outcome.max_score, error
                )),
                None => out.push_str(&format!(
                    "- item {}: score {}/{}\n",
                    outcome.item_id, outcome.score, outcome.max_score
                )),
            }
        }
    }

    out
}

/// Write the Markdown summary artifact.
pub fn write_report_md(path: &Path, report: &BenchmarkReport) -> Result<()> {
    let md = render_report_md(report);
    std::fs::write(path, md).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::outcome::ItemOutcome;
    use serde_json::{Map, Value};

    fn report() -> BenchmarkReport {
        BenchmarkReport {
            benchmark_name: "product_qa".to_string(),
            subject_name: "scripted".to_string(),
            total_items: 2,
            correct_count: 1,
            accuracy: 0.5,
            execution_time: 1.5,
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            detailed_results: vec![
                ItemOutcome {
                    item_id: 0,
                    raw_output: Value::String("titanium".to_string()),
                    extracted: Value::String("titanium".to_string()),
                    score: 1.0,
                    max_score: 1.0,
                    correct: true,
                    notes: "expected titanium".to_string(),
                    error: None,
                },
                ItemOutcome::failed(1, 1.0, "subject timed out"),
            ],
            metadata: {
                let mut m = Map::new();
                m.insert("precision".to_string(), Value::from(1.0));
                m.insert("recall".to_string(), Value::from(0.5));
                m
            },
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");

        let original = report();
        save_report(&path, &original).expect("save");
        let loaded = load_report(&path).expect("load");

        assert_eq!(original, loaded);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_report(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_markdown_render_is_stable() {
        let actual = render_report_md(&report());
        let expected = "# Benchmark Report: product_qa\n\n\
                        - subject: scripted\n\
                        - items: 2 (1 correct)\n\
                        - accuracy: 50.00%\n\
                        - execution time: 1.50s\n\
                        - timestamp: 2026-01-01T00:00:00+00:00\n\
                        \n## Incorrect Items\n\n\
                        - item 1: score 0/1 (error: subject timed out)\n";
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_markdown_omits_empty_failure_section() {
        let mut r = report();
        r.detailed_results.truncate(1);
        r.correct_count = 1;
        r.total_items = 1;
        let md = render_report_md(&r);
        assert!(!md.contains("Incorrect Items"));
    }
}
