use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Url};

use crate::output;
use crate::types::{CheckResult, CheckSpec, HttpMethod, Outcome};

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Executes single HTTP checks against a base URL and classifies outcomes.
///
/// The client and base URL are injected at construction; there is no shared
/// process-wide session.
pub struct CheckRunner {
    client: Client,
    base_url: Url,
    verbose: bool,
}

impl CheckRunner {
    pub fn new(base_url: &str, verbose: bool) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent(concat!("smokecheck/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid base URL '{base_url}'"))?;
        Ok(CheckRunner {
            client,
            base_url,
            verbose,
        })
    }

    /// Run one check: exactly one request, no retries. Never fails; every
    /// failure mode (status mismatch, timeout, transport error, bad URL) is
    /// classified into a FAIL result. Also prints one line per check.
    pub async fn run_check(&self, spec: &CheckSpec) -> CheckResult {
        // Relative paths join against the base URL; absolute URLs override it.
        let url = match self.base_url.join(&spec.path) {
            Ok(url) => url,
            Err(e) => {
                let result = CheckResult {
                    name: spec.name.clone(),
                    url: spec.path.clone(),
                    outcome: Outcome::Fail,
                    latency_ms: None,
                    status_code: None,
                    error: Some(format!("Invalid URL '{}': {e}", spec.path)),
                };
                output::log_check(&result, self.verbose);
                return result;
            }
        };

        let mut request = self
            .client
            .request(spec.method.into(), url.clone())
            .timeout(Duration::from_secs(spec.timeout_secs));
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let start = Instant::now();
        let result = match request.send().await {
            Ok(response) => {
                let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
                let status = response.status().as_u16();
                if status == spec.expected_status {
                    CheckResult {
                        name: spec.name.clone(),
                        url: url.to_string(),
                        outcome: Outcome::Pass,
                        latency_ms: Some(latency_ms),
                        status_code: Some(status),
                        error: None,
                    }
                } else {
                    CheckResult {
                        name: spec.name.clone(),
                        url: url.to_string(),
                        outcome: Outcome::Fail,
                        latency_ms: Some(latency_ms),
                        status_code: Some(status),
                        error: Some(format!(
                            "Expected {}, got {}",
                            spec.expected_status, status
                        )),
                    }
                }
            }
            Err(e) if e.is_timeout() => CheckResult {
                name: spec.name.clone(),
                url: url.to_string(),
                outcome: Outcome::Fail,
                latency_ms: Some(spec.timeout_secs as f64 * 1000.0),
                status_code: None,
                error: Some("Timeout".to_string()),
            },
            Err(e) => CheckResult {
                name: spec.name.clone(),
                url: url.to_string(),
                outcome: Outcome::Fail,
                latency_ms: None,
                status_code: None,
                error: Some(e.to_string()),
            },
        };

        output::log_check(&result, self.verbose);
        result
    }

    /// Fetch the base URL once and return the response headers. Used by the
    /// advisory security-header inspection, not by ordinary checks.
    pub async fn probe_headers(&self) -> Result<HeaderMap> {
        let response = self
            .client
            .get(self.base_url.clone())
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .context("Failed to fetch base URL for header inspection")?;
        Ok(response.headers().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_spec(path: &str, expected_status: u16, timeout_secs: u64) -> CheckSpec {
        CheckSpec::get("test", path, timeout_secs).expect_status(expected_status)
    }

    #[tokio::test]
    async fn test_pass_on_expected_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_body("{\"status\":\"ok\"}")
            .create_async()
            .await;

        let runner = CheckRunner::new(&server.url(), false).unwrap();
        let result = runner.run_check(&get_spec("/health", 200, 10)).await;

        assert_eq!(result.outcome, Outcome::Pass);
        assert_eq!(result.status_code, Some(200));
        assert!(result.latency_ms.unwrap() > 0.0);
        assert!(result.error.is_none());
        assert!(result.url.ends_with("/health"));
    }

    #[tokio::test]
    async fn test_fail_on_status_mismatch() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/admin")
            .with_status(200)
            .create_async()
            .await;

        let runner = CheckRunner::new(&server.url(), false).unwrap();
        let result = runner.run_check(&get_spec("/admin", 401, 10)).await;

        assert_eq!(result.outcome, Outcome::Fail);
        assert_eq!(result.status_code, Some(200));
        assert_eq!(result.error.as_deref(), Some("Expected 401, got 200"));
        // Latency is still recorded when the request completed.
        assert!(result.latency_ms.is_some());
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/users/register")
            .match_header("content-type", "application/json")
            .with_status(201)
            .create_async()
            .await;

        let runner = CheckRunner::new(&server.url(), false).unwrap();
        let spec = CheckSpec::post(
            "User Registration",
            "/api/users/register",
            201,
            10,
            serde_json::json!({"username": "testuser_1", "email": "t@example.com"}),
        );
        let result = runner.run_check(&spec).await;

        assert_eq!(result.outcome, Outcome::Pass);
        assert_eq!(result.status_code, Some(201));
    }

    #[tokio::test]
    async fn test_transport_failure_has_no_latency() {
        // Bind then drop to get a port with nothing listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let runner = CheckRunner::new(&format!("http://127.0.0.1:{port}"), false).unwrap();
        let result = runner.run_check(&get_spec("/health", 200, 10)).await;

        assert_eq!(result.outcome, Outcome::Fail);
        assert!(result.status_code.is_none());
        assert!(result.latency_ms.is_none());
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_timeout_records_full_timeout_latency() {
        // A listener that accepts but never responds forces a client timeout.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = std::thread::spawn(move || {
            let conn = listener.accept();
            std::thread::sleep(std::time::Duration::from_secs(3));
            drop(conn);
        });

        let runner = CheckRunner::new(&format!("http://127.0.0.1:{port}"), false).unwrap();
        let result = runner.run_check(&get_spec("/health", 200, 1)).await;

        assert_eq!(result.outcome, Outcome::Fail);
        assert_eq!(result.error.as_deref(), Some("Timeout"));
        assert_eq!(result.latency_ms, Some(1000.0));
        assert!(result.status_code.is_none());
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn test_idempotent_outcome_for_unchanged_target() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/products")
            .with_status(200)
            .expect_at_least(2)
            .create_async()
            .await;

        let runner = CheckRunner::new(&server.url(), false).unwrap();
        let first = runner.run_check(&get_spec("/api/products", 200, 10)).await;
        let second = runner.run_check(&get_spec("/api/products", 200, 10)).await;

        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.status_code, second.status_code);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(CheckRunner::new("not a url", false).is_err());
    }

    #[tokio::test]
    async fn test_absolute_path_overrides_base_url() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/elsewhere")
            .with_status(200)
            .create_async()
            .await;

        // Base URL points at a dead port; the absolute path wins.
        let runner = CheckRunner::new("http://localhost:1", false).unwrap();
        let absolute = format!("{}/elsewhere", server.url());
        let result = runner.run_check(&get_spec(&absolute, 200, 10)).await;

        assert_eq!(result.outcome, Outcome::Pass);
        assert_eq!(result.url, absolute);
    }
}
