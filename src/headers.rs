use reqwest::header::HeaderMap;

/// How an expected security header is matched against the observed value.
#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Value must contain this substring.
    Contains(&'static str),
    /// Value must contain at least one of these substrings.
    AnyOf(&'static [&'static str]),
}

struct HeaderExpectation {
    name: &'static str,
    rule: Rule,
}

/// Response headers a hardened deployment is expected to send on its root
/// document. Inspection is advisory only.
const SECURITY_HEADERS: &[HeaderExpectation] = &[
    HeaderExpectation {
        name: "X-Content-Type-Options",
        rule: Rule::Contains("nosniff"),
    },
    HeaderExpectation {
        name: "X-Frame-Options",
        rule: Rule::AnyOf(&["DENY", "SAMEORIGIN"]),
    },
    HeaderExpectation {
        name: "X-XSS-Protection",
        rule: Rule::Contains("1; mode=block"),
    },
    HeaderExpectation {
        name: "Strict-Transport-Security",
        rule: Rule::Contains("max-age="),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStatus {
    Valid,
    Invalid,
    Missing,
}

#[derive(Debug, Clone)]
pub struct HeaderFinding {
    pub header: &'static str,
    pub status: HeaderStatus,
    /// Observed value, when the header was present and readable as text.
    pub value: Option<String>,
}

/// Classify each expected security header as valid, invalid, or missing.
pub fn evaluate_headers(headers: &HeaderMap) -> Vec<HeaderFinding> {
    SECURITY_HEADERS
        .iter()
        .map(|expectation| {
            let observed = headers
                .get(expectation.name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string());
            let status = match &observed {
                Some(value) => {
                    if matches_rule(value, expectation.rule) {
                        HeaderStatus::Valid
                    } else {
                        HeaderStatus::Invalid
                    }
                }
                None => HeaderStatus::Missing,
            };
            HeaderFinding {
                header: expectation.name,
                status,
                value: observed,
            }
        })
        .collect()
}

fn matches_rule(value: &str, rule: Rule) -> bool {
    match rule {
        Rule::Contains(needle) => value.contains(needle),
        Rule::AnyOf(needles) => needles.iter().any(|needle| value.contains(needle)),
    }
}
