mod check;
mod cli;
mod config;
mod discover;
mod headers;
mod output;
mod perf;
mod report;
mod suites;
mod types;

use std::path::Path;

use clap::Parser;
use console::Style;

use cli::{Cli, Commands};

// Checks are strictly sequential, so a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            env,
            url,
            tests,
            config,
            dry_run,
            json,
        } => {
            let exit_code = run_suites(
                env,
                url.as_deref(),
                &tests,
                config.as_deref(),
                dry_run,
                json,
                cli.verbose,
            )
            .await;
            std::process::exit(exit_code);
        }
        Commands::Results { report } => {
            match report::load_report(Path::new(&report)) {
                Ok(loaded) => {
                    report::print_summary(&loaded);
                    std::process::exit(if loaded.summary.failed == 0 { 0 } else { 1 });
                }
                Err(e) => {
                    eprintln!("Error: {e:#}");
                    std::process::exit(2);
                }
            }
        }
    }
}

/// Run the selected suites end to end.
/// Returns exit code: 0=all passed, 1=check failures, 2=operational error.
async fn run_suites(
    env: config::Environment,
    url_override: Option<&str>,
    tests: &[suites::SuiteSelect],
    config_path: Option<&str>,
    dry_run: bool,
    json: bool,
    verbose: bool,
) -> i32 {
    let config_path = config_path
        .map(std::path::PathBuf::from)
        .unwrap_or_else(config::default_config_path);
    let cfg = match config::load_optional(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return 2;
        }
    };

    let selected = suites::resolve_suites(tests);

    if dry_run {
        let planned = suites::plan(&selected, &cfg.tuning);
        if json {
            suites::print_plan_json(&planned);
        } else {
            suites::print_plan_table(&planned);
        }
        return 0;
    }

    let base_url = resolve_base_url(env, url_override, &cfg, verbose).await;

    let bold = Style::new().bold();
    println!(
        "{}",
        bold.apply_to(format!(
            "Starting Smoke Tests for {} environment",
            env.as_str().to_uppercase()
        ))
    );
    println!("Base URL: {base_url}");

    let runner = match check::CheckRunner::new(&base_url, verbose) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return 2;
        }
    };

    let mut suite_runner = suites::SuiteRunner::new(runner, cfg.tuning.clone());
    suite_runner.run(&selected).await;
    let results = suite_runner.into_results();

    let (_report, success) = report::generate_report(results, env.as_str(), &base_url);
    if success { 0 } else { 1 }
}

/// Base URL precedence: --url flag, then the config file entry for the
/// environment, then cluster ingress discovery with localhost fallback.
async fn resolve_base_url(
    env: config::Environment,
    url_override: Option<&str>,
    cfg: &config::Config,
    verbose: bool,
) -> String {
    if let Some(url) = url_override {
        return url.to_string();
    }
    if let Some(url) = cfg.base_url_for(env) {
        return url.to_string();
    }

    let pb = output::stage_spinner("Discovering base URL from cluster ingress...");
    let discovered = discover::discover_base_url(env, verbose).await;
    output::finish_spinner(&pb, true);
    discovered
}
