use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use serde::Deserialize;

/// Deployment environment a run is tagged with. Also picks the localhost
/// fallback port when discovery yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }

    pub fn fallback_port(&self) -> u16 {
        match self {
            Environment::Dev => 3000,
            Environment::Staging | Environment::Prod => 80,
        }
    }
}

/// Per-environment settings from the optional config file.
#[derive(Debug, Deserialize)]
pub struct EnvConfig {
    pub base_url: String,
}

/// Knobs with built-in defaults; the config file may override any subset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Per-check request timeout.
    pub timeout_secs: u64,
    /// Performance-suite average latency above which a warning is printed.
    pub perf_warn_ms: f64,
    /// Sequential repetitions per performance-suite endpoint.
    pub perf_iterations: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            timeout_secs: 10,
            perf_warn_ms: 1000.0,
            perf_iterations: 10,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environments: HashMap<String, EnvConfig>,
    #[serde(default)]
    pub tuning: Tuning,
}

impl Config {
    pub fn base_url_for(&self, env: Environment) -> Option<&str> {
        self.environments
            .get(env.as_str())
            .map(|e| e.base_url.as_str())
    }
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(config)
}

/// Load the config file if it exists; built-in defaults otherwise. A file
/// that exists but does not parse is an error, not a silent fallback.
pub fn load_optional(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}

/// Returns the default path to `smokecheck.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("smokecheck.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.tuning.timeout_secs, 10);
        assert_eq!(config.tuning.perf_warn_ms, 1000.0);
        assert_eq!(config.tuning.perf_iterations, 10);
        assert!(config.base_url_for(Environment::Dev).is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [environments.staging]
            base_url = "https://staging.example.com"

            [tuning]
            timeout_secs = 5
            perf_iterations = 3
            "#,
        )
        .unwrap();
        assert_eq!(
            config.base_url_for(Environment::Staging),
            Some("https://staging.example.com")
        );
        assert!(config.base_url_for(Environment::Prod).is_none());
        assert_eq!(config.tuning.timeout_secs, 5);
        assert_eq!(config.tuning.perf_iterations, 3);
        // Unset keys keep their defaults.
        assert_eq!(config.tuning.perf_warn_ms, 1000.0);
    }

    #[test]
    fn test_fallback_ports() {
        assert_eq!(Environment::Dev.fallback_port(), 3000);
        assert_eq!(Environment::Staging.fallback_port(), 80);
        assert_eq!(Environment::Prod.fallback_port(), 80);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_optional(Path::new("/nonexistent/smokecheck.toml")).unwrap();
        assert!(config.environments.is_empty());
    }

    #[test]
    fn test_unparsable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smokecheck.toml");
        std::fs::write(&path, "not [valid toml").unwrap();
        assert!(load_optional(&path).is_err());
    }
}
