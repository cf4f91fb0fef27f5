use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::headers::{HeaderFinding, HeaderStatus};
use crate::perf::LatencyStats;
use crate::types::CheckResult;

pub fn stage_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner} {msg}")
            .expect("invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

pub fn finish_spinner(pb: &ProgressBar, success: bool) {
    if success {
        pb.finish_with_message(format!("✓ {}", pb.message()));
    } else {
        pb.finish_with_message(format!("✗ {}", pb.message()));
    }
}

/// Blue section header printed before each suite runs.
pub fn suite_banner(title: &str) {
    let blue = Style::new().blue().bold();
    println!("\n{}", blue.apply_to(format!("Running {title}...")));
}

/// One line per executed check: symbol, name, then status + latency on a
/// pass or the error detail on a failure.
pub fn log_check(result: &CheckResult, verbose: bool) {
    let green = Style::new().green();
    let red = Style::new().red();

    if result.passed() {
        let status = result.status_code.unwrap_or_default();
        let latency = result.latency_ms.unwrap_or_default();
        println!(
            "  {} {}: {} ({:.2}ms)",
            green.apply_to("✓"),
            result.name,
            status,
            latency
        );
    } else {
        let detail = result.error.as_deref().unwrap_or("Unknown error");
        println!("  {} {}: {}", red.apply_to("✗"), result.name, detail);
    }

    if verbose {
        let dim = Style::new().dim();
        println!("      {}", dim.apply_to(&result.url));
    }
}

/// Advisory min/avg/max summary for one performance-suite endpoint.
pub fn perf_summary(endpoint: &str, stats: &LatencyStats, warn_threshold_ms: f64) {
    println!("\nPerformance Summary for {endpoint}:");
    println!("  Average: {:.2}ms", stats.avg);
    println!("  Min: {:.2}ms", stats.min);
    println!("  Max: {:.2}ms", stats.max);
    if stats.is_slow(warn_threshold_ms) {
        let yellow = Style::new().yellow();
        println!(
            "  {}",
            yellow.apply_to(format!(
                "Warning: average response time > {:.0}ms",
                warn_threshold_ms
            ))
        );
    }
}

/// Advisory security-header finding. Never affects the run outcome.
pub fn log_header_finding(finding: &HeaderFinding) {
    let green = Style::new().green();
    let red = Style::new().red();
    let yellow = Style::new().yellow();

    match finding.status {
        HeaderStatus::Valid => {
            let value = finding.value.as_deref().unwrap_or_default();
            println!("  {} {}: {}", green.apply_to("✓"), finding.header, value);
        }
        HeaderStatus::Invalid => {
            println!("  {} {}: Invalid value", red.apply_to("✗"), finding.header);
        }
        HeaderStatus::Missing => {
            println!("  {} {}: Missing", yellow.apply_to("✗"), finding.header);
        }
    }
}

pub fn warn(message: &str) {
    let yellow = Style::new().yellow().bold();
    eprintln!("{} {}", yellow.apply_to("WARNING:"), message);
}
