use clap::{Parser, Subcommand};

use crate::config::Environment;
use crate::suites::SuiteSelect;

#[derive(Parser, Debug)]
#[command(name = "smokecheck", about = "Post-deployment smoke tests for the e-commerce platform")]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run smoke test suites against a deployed environment
    Run {
        /// Environment to test
        #[arg(long, value_enum, default_value = "dev")]
        env: Environment,

        /// Base URL to test (overrides the environment default and ingress discovery)
        #[arg(long)]
        url: Option<String>,

        /// Suites to run
        #[arg(long = "tests", value_enum, num_args = 1.., default_values = ["all"])]
        tests: Vec<SuiteSelect>,

        /// Path to a TOML config file (default: ./smokecheck.toml when present)
        #[arg(long)]
        config: Option<String>,

        /// Print the resolved check plan without issuing any requests
        #[arg(long)]
        dry_run: bool,

        /// Output the dry-run plan as JSON (requires --dry-run)
        #[arg(long, requires = "dry_run")]
        json: bool,
    },

    /// Re-print the summary from a previously saved report file
    Results {
        /// Path to a smoke_test_report_*.json file
        #[arg(long)]
        report: String,
    },
}
