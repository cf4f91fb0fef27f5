use serde::{Deserialize, Serialize};

/// HTTP verbs a check may use. Unsupported verbs are unrepresentable, so a
/// bad method is caught when a catalog entry is written, not at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
}

/// One named request/expectation pair, resolved against the base URL at
/// execution time.
#[derive(Debug, Clone)]
pub struct CheckSpec {
    pub name: String,
    pub path: String,
    pub method: HttpMethod,
    pub expected_status: u16,
    pub timeout_secs: u64,
    pub body: Option<serde_json::Value>,
}

impl CheckSpec {
    /// GET expecting 200, the most common shape in the catalogs.
    pub fn get(name: impl Into<String>, path: impl Into<String>, timeout_secs: u64) -> Self {
        CheckSpec {
            name: name.into(),
            path: path.into(),
            method: HttpMethod::Get,
            expected_status: 200,
            timeout_secs,
            body: None,
        }
    }

    pub fn expect_status(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }

    /// POST with a JSON payload.
    pub fn post(
        name: impl Into<String>,
        path: impl Into<String>,
        expected_status: u16,
        timeout_secs: u64,
        body: serde_json::Value,
    ) -> Self {
        CheckSpec {
            name: name.into(),
            path: path.into(),
            method: HttpMethod::Post,
            expected_status,
            timeout_secs,
            body: Some(body),
        }
    }
}

/// Outcome of a single check invocation. Every executed check produces
/// exactly one of these, appended to the run's results in execution order.
///
/// `latency_ms` is present whenever the request completed (even on a status
/// mismatch) and equals the full timeout on a timed-out request; it is absent
/// when the request failed before completion. `status_code` is present only
/// when a response was received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub url: String,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }
}
