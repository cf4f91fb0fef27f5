use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use chrono::Local;
use console::Style;
use serde::{Deserialize, Serialize};

use crate::output;
use crate::types::CheckResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage with full precision; rounded for display only.
    pub pass_rate: f64,
}

impl Summary {
    pub fn from_results(results: &[CheckResult]) -> Summary {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed()).count();
        let failed = total - passed;
        let pass_rate = if total > 0 {
            passed as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Summary {
            total,
            passed,
            failed,
            pass_rate,
        }
    }
}

/// The full run report: finalized once, then printed and persisted.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuiteReport {
    pub environment: String,
    pub timestamp: String,
    pub base_url: String,
    pub summary: Summary,
    pub results: Vec<CheckResult>,
}

/// Finalize the run: compute the summary, print it, and persist the report
/// to the working directory. Returns the report and whether every check
/// passed. A report-file write failure is a warning, never a run failure.
pub fn generate_report(
    results: Vec<CheckResult>,
    environment: &str,
    base_url: &str,
) -> (SuiteReport, bool) {
    let summary = Summary::from_results(&results);
    let report = SuiteReport {
        environment: environment.to_string(),
        timestamp: Local::now().to_rfc3339(),
        base_url: base_url.to_string(),
        summary,
        results,
    };

    print_summary(&report);

    match write_report(&report, Path::new(".")) {
        Ok(path) => println!("\nDetailed report saved to: {}", path.display()),
        Err(e) => output::warn(&format!("Could not write report file: {e:#}")),
    }

    let success = report.summary.failed == 0;
    (report, success)
}

/// Print the styled console summary, including failed check details.
pub fn print_summary(report: &SuiteReport) {
    let bold = Style::new().bold();
    let green = Style::new().green();
    let red = Style::new().red();

    println!("\n{}", bold.apply_to("=".repeat(60)));
    println!(
        "{}",
        bold.apply_to(format!(
            "SMOKE TEST REPORT - {} ENVIRONMENT",
            report.environment.to_uppercase()
        ))
    );
    println!("{}", bold.apply_to("=".repeat(60)));
    println!("Timestamp: {}", report.timestamp);
    println!("Base URL: {}", report.base_url);
    println!("\nResults:");
    println!("  Total Tests: {}", report.summary.total);
    println!("  {}", green.apply_to(format!("Passed: {}", report.summary.passed)));
    println!("  {}", red.apply_to(format!("Failed: {}", report.summary.failed)));
    println!("  Pass Rate: {:.1}%", report.summary.pass_rate);

    if report.summary.failed > 0 {
        println!("\n{}", red.apply_to("Failed Tests:"));
        for result in report.results.iter().filter(|r| !r.passed()) {
            let detail = result.error.as_deref().unwrap_or("Unknown error");
            println!("  - {}: {}", result.name, detail);
        }
    }
}

/// Write the report as pretty-printed JSON, named from the environment and
/// the current unix time.
pub fn write_report(report: &SuiteReport, dir: &Path) -> Result<PathBuf> {
    let unix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let path = dir.join(format!(
        "smoke_test_report_{}_{}.json",
        report.environment, unix
    ));
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(path)
}

/// Re-load a persisted report for re-analysis.
pub fn load_report(path: &Path) -> Result<SuiteReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report file: {}", path.display()))?;
    let report: SuiteReport = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse report: {}", path.display()))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;

    fn result(name: &str, outcome: Outcome) -> CheckResult {
        CheckResult {
            name: name.to_string(),
            url: format!("http://localhost:3000/{name}"),
            outcome,
            latency_ms: Some(10.0),
            status_code: Some(200),
            error: match outcome {
                Outcome::Pass => None,
                Outcome::Fail => Some("Expected 200, got 500".to_string()),
            },
        }
    }

    #[test]
    fn test_summary_counts_add_up() {
        let results = vec![
            result("a", Outcome::Pass),
            result("b", Outcome::Fail),
            result("c", Outcome::Pass),
            result("d", Outcome::Pass),
        ];
        let summary = Summary::from_results(&results);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.passed + summary.failed, summary.total);
        assert_eq!(summary.pass_rate, 75.0);
    }

    #[test]
    fn test_empty_run_has_zero_pass_rate_and_succeeds() {
        let (report, success) = generate_report(Vec::new(), "dev", "http://localhost:3000");
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.summary.pass_rate, 0.0);
        assert!(success);
        // generate_report writes into the working directory; clean up.
        for entry in std::fs::read_dir(".").unwrap().flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with("smoke_test_report_dev_") {
                let _ = std::fs::remove_file(entry.path());
            }
        }
    }

    #[test]
    fn test_pass_rate_keeps_precision() {
        let results = vec![
            result("a", Outcome::Pass),
            result("b", Outcome::Pass),
            result("c", Outcome::Fail),
        ];
        let summary = Summary::from_results(&results);
        assert!((summary.pass_rate - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_write_and_reload_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = SuiteReport {
            environment: "staging".to_string(),
            timestamp: "2026-08-07T12:00:00+00:00".to_string(),
            base_url: "https://staging.example.com".to_string(),
            summary: Summary::from_results(&[result("a", Outcome::Fail)]),
            results: vec![result("a", Outcome::Fail)],
        };
        let path = write_report(&report, dir.path()).unwrap();
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("smoke_test_report_staging_")
        );

        let loaded = load_report(&path).unwrap();
        assert_eq!(loaded.environment, "staging");
        assert_eq!(loaded.summary.failed, 1);
        assert_eq!(loaded.results[0].error.as_deref(), Some("Expected 200, got 500"));
    }

    #[test]
    fn test_write_failure_surfaces_as_error() {
        let report = SuiteReport {
            environment: "dev".to_string(),
            timestamp: "2026-08-07T12:00:00+00:00".to_string(),
            base_url: "http://localhost:3000".to_string(),
            summary: Summary::from_results(&[]),
            results: Vec::new(),
        };
        assert!(write_report(&report, Path::new("/nonexistent/dir")).is_err());
    }

    #[test]
    fn test_load_report_missing_file() {
        assert!(load_report(Path::new("/nonexistent/report.json")).is_err());
    }
}
