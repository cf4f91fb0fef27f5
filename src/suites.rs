use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use serde::Serialize;

use crate::check::CheckRunner;
use crate::config::Tuning;
use crate::headers;
use crate::output;
use crate::perf::LatencyStats;
use crate::types::{CheckResult, CheckSpec, HttpMethod};

/// The five check suites, in their fixed execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    Health,
    Api,
    Performance,
    Security,
    Monitoring,
}

pub const SUITE_ORDER: &[Suite] = &[
    Suite::Health,
    Suite::Api,
    Suite::Performance,
    Suite::Security,
    Suite::Monitoring,
];

impl Suite {
    pub fn title(&self) -> &'static str {
        match self {
            Suite::Health => "Health Checks",
            Suite::Api => "API Tests",
            Suite::Performance => "Performance Tests",
            Suite::Security => "Security Tests",
            Suite::Monitoring => "Monitoring Tests",
        }
    }
}

/// What `--tests` accepts: any suite name, or `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuiteSelect {
    Health,
    Api,
    Performance,
    Security,
    Monitoring,
    All,
}

/// Resolve the requested suite names to the execution list. Suites always
/// run in `SUITE_ORDER`, never in the caller's argument order; duplicates
/// collapse; an empty request resolves to an empty plan.
pub fn resolve_suites(requested: &[SuiteSelect]) -> Vec<Suite> {
    if requested.contains(&SuiteSelect::All) {
        return SUITE_ORDER.to_vec();
    }
    SUITE_ORDER
        .iter()
        .copied()
        .filter(|suite| {
            requested.iter().any(|select| {
                matches!(
                    (*select, *suite),
                    (SuiteSelect::Health, Suite::Health)
                        | (SuiteSelect::Api, Suite::Api)
                        | (SuiteSelect::Performance, Suite::Performance)
                        | (SuiteSelect::Security, Suite::Security)
                        | (SuiteSelect::Monitoring, Suite::Monitoring)
                )
            })
        })
        .collect()
}

// --- Check catalogs ---

const HEALTH_ENDPOINTS: &[(&str, &str)] = &[
    ("Frontend Health", "/health"),
    ("API Gateway Health", "/api/health"),
    ("Product Service Health", "/api/products/health"),
    ("Order Service Health", "/api/orders/health"),
    ("User Service Health", "/api/users/health"),
];

const API_GET_ENDPOINTS: &[(&str, &str)] = &[
    ("API Info", "/api"),
    ("List Products", "/api/products"),
    ("Get Product", "/api/products/1"),
];

const PERF_ENDPOINTS: &[&str] = &["/api/products", "/api/users", "/api/orders"];

/// Sensitive paths that must not be exposed: (name, path, expected status).
const SENSITIVE_ENDPOINTS: &[(&str, &str, u16)] = &[
    ("Admin without auth", "/admin", 401),
    ("Metrics without auth", "/metrics", 401),
    ("Config endpoint", "/config", 404),
    ("Environment vars", "/env", 404),
    (".git folder", "/.git/config", 404),
];

const MONITORING_ENDPOINTS: &[(&str, &str)] = &[
    ("Prometheus Metrics", "/metrics"),
    ("Readiness Probe", "/ready"),
    ("Liveness Probe", "/health"),
];

const REGISTRATION_PATH: &str = "/api/users/register";

/// Unique registration payload so repeated runs don't collide on username
/// or email uniqueness constraints.
fn registration_payload() -> serde_json::Value {
    let unix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    serde_json::json!({
        "username": format!("testuser_{unix}"),
        "email": format!("test_{unix}@example.com"),
        "password": "TestPass123!",
    })
}

// --- Orchestrator ---

/// Runs the requested suites sequentially and accumulates every executed
/// check's result in execution order.
pub struct SuiteRunner {
    runner: CheckRunner,
    tuning: Tuning,
    results: Vec<CheckResult>,
}

impl SuiteRunner {
    pub fn new(runner: CheckRunner, tuning: Tuning) -> Self {
        SuiteRunner {
            runner,
            tuning,
            results: Vec::new(),
        }
    }

    pub async fn run(&mut self, suites: &[Suite]) {
        for suite in suites {
            match suite {
                Suite::Health => self.run_health().await,
                Suite::Api => self.run_api().await,
                Suite::Performance => self.run_performance().await,
                Suite::Security => self.run_security().await,
                Suite::Monitoring => self.run_monitoring().await,
            }
        }
    }

    pub fn into_results(self) -> Vec<CheckResult> {
        self.results
    }

    async fn execute(&mut self, spec: CheckSpec) {
        let result = self.runner.run_check(&spec).await;
        self.results.push(result);
    }

    async fn run_health(&mut self) {
        output::suite_banner(Suite::Health.title());
        for (name, path) in HEALTH_ENDPOINTS {
            self.execute(CheckSpec::get(*name, *path, self.tuning.timeout_secs))
                .await;
        }
    }

    async fn run_api(&mut self) {
        output::suite_banner(Suite::Api.title());
        for (name, path) in API_GET_ENDPOINTS {
            self.execute(CheckSpec::get(*name, *path, self.tuning.timeout_secs))
                .await;
        }
        self.execute(CheckSpec::post(
            "User Registration",
            REGISTRATION_PATH,
            201,
            self.tuning.timeout_secs,
            registration_payload(),
        ))
        .await;
        self.execute(CheckSpec::get(
            "List Orders",
            "/api/orders",
            self.tuning.timeout_secs,
        ))
        .await;
    }

    async fn run_performance(&mut self) {
        output::suite_banner(Suite::Performance.title());
        for endpoint in PERF_ENDPOINTS {
            let mut latencies = Vec::new();
            for i in 0..self.tuning.perf_iterations {
                let spec = CheckSpec::get(
                    format!("Performance Test {}", i + 1),
                    *endpoint,
                    self.tuning.timeout_secs,
                );
                let result = self.runner.run_check(&spec).await;
                // Only completed, passing repetitions feed the statistics.
                if result.passed() {
                    if let Some(latency) = result.latency_ms {
                        latencies.push(latency);
                    }
                }
                self.results.push(result);
            }
            if let Some(stats) = LatencyStats::from_samples(&latencies) {
                output::perf_summary(endpoint, &stats, self.tuning.perf_warn_ms);
            }
        }
    }

    async fn run_security(&mut self) {
        output::suite_banner(Suite::Security.title());
        for (name, path, expected) in SENSITIVE_ENDPOINTS {
            self.execute(
                CheckSpec::get(*name, *path, self.tuning.timeout_secs)
                    .expect_status(*expected),
            )
            .await;
        }

        // Header inspection is advisory: findings are printed but never
        // recorded as check results.
        println!("\nSecurity Headers Check:");
        match self.runner.probe_headers().await {
            Ok(response_headers) => {
                for finding in headers::evaluate_headers(&response_headers) {
                    output::log_header_finding(&finding);
                }
            }
            Err(e) => output::warn(&format!("Security header check skipped: {e:#}")),
        }
    }

    async fn run_monitoring(&mut self) {
        output::suite_banner(Suite::Monitoring.title());
        for (name, path) in MONITORING_ENDPOINTS {
            self.execute(CheckSpec::get(*name, *path, self.tuning.timeout_secs))
                .await;
        }
    }
}

// --- Dry-run plan ---

/// One catalog entry of the resolved execution plan.
#[derive(Debug, Serialize)]
pub struct PlannedCheck {
    pub suite: Suite,
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub expected_status: u16,
    /// Sequential repetitions (10 per endpoint in the performance suite).
    pub count: u32,
}

/// Resolve the catalogs for the selected suites without issuing requests.
pub fn plan(suites: &[Suite], tuning: &Tuning) -> Vec<PlannedCheck> {
    let mut planned = Vec::new();
    for suite in suites {
        match suite {
            Suite::Health => {
                for (name, path) in HEALTH_ENDPOINTS {
                    planned.push(planned_get(Suite::Health, name, path, 200, 1));
                }
            }
            Suite::Api => {
                for (name, path) in API_GET_ENDPOINTS {
                    planned.push(planned_get(Suite::Api, name, path, 200, 1));
                }
                planned.push(PlannedCheck {
                    suite: Suite::Api,
                    name: "User Registration".to_string(),
                    method: HttpMethod::Post,
                    path: REGISTRATION_PATH.to_string(),
                    expected_status: 201,
                    count: 1,
                });
                planned.push(planned_get(Suite::Api, "List Orders", "/api/orders", 200, 1));
            }
            Suite::Performance => {
                for endpoint in PERF_ENDPOINTS {
                    planned.push(planned_get(
                        Suite::Performance,
                        &format!("Performance {endpoint}"),
                        endpoint,
                        200,
                        tuning.perf_iterations,
                    ));
                }
            }
            Suite::Security => {
                for (name, path, expected) in SENSITIVE_ENDPOINTS {
                    planned.push(planned_get(Suite::Security, name, path, *expected, 1));
                }
            }
            Suite::Monitoring => {
                for (name, path) in MONITORING_ENDPOINTS {
                    planned.push(planned_get(Suite::Monitoring, name, path, 200, 1));
                }
            }
        }
    }
    planned
}

fn planned_get(suite: Suite, name: &str, path: &str, expected_status: u16, count: u32) -> PlannedCheck {
    PlannedCheck {
        suite,
        name: name.to_string(),
        method: HttpMethod::Get,
        path: path.to_string(),
        expected_status,
        count,
    }
}

/// Print a human-readable table of the resolved plan.
pub fn print_plan_table(planned: &[PlannedCheck]) {
    println!(
        "{:<12} {:<28} {:<7} {:<22} {:<8} {}",
        "SUITE", "CHECK", "METHOD", "PATH", "EXPECT", "COUNT"
    );
    println!(
        "{:<12} {:<28} {:<7} {:<22} {:<8} {}",
        "-----", "-----", "------", "----", "------", "-----"
    );
    for check in planned {
        println!(
            "{:<12} {:<28} {:<7} {:<22} {:<8} {}",
            format!("{:?}", check.suite).to_lowercase(),
            check.name,
            check.method.as_str(),
            check.path,
            check.expected_status,
            check.count
        );
    }
}

/// Print the resolved plan as JSON.
pub fn print_plan_json(planned: &[PlannedCheck]) {
    match serde_json::to_string_pretty(planned) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing JSON: {e}"),
    }
}
