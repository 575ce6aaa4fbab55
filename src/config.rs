//! Runtime settings for the optimizer worker pool.
//!
//! Settings are read from an optional JSON file, then the
//! `CAPITAL_OPTIMIZER_WORKERS` environment variable, then CLI flags, with
//! later sources taking precedence.

use crate::error::OptimizerError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable overriding [`OptimizerConfig::worker_threads`].
pub const WORKERS_ENV: &str = "CAPITAL_OPTIMIZER_WORKERS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Threads reserved for CPU-bound optimization work.
    pub worker_threads: usize,
    /// Worker threads are named `<prefix>-<index>`.
    pub thread_name_prefix: String,
    /// Emit per-round selection events through the `log` facade.
    pub log_rounds: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            worker_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            thread_name_prefix: "capital-optimizer".to_string(),
            log_rounds: true,
        }
    }
}

impl OptimizerConfig {
    /// Load settings from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, OptimizerError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            OptimizerError::Config(format!(
                "cannot read config '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            OptimizerError::Config(format!("invalid config '{}': {}", path.display(), e))
        })?;
        config.validated()
    }

    /// Apply `CAPITAL_OPTIMIZER_WORKERS` if it is set.
    pub fn with_env_overrides(self) -> Result<Self, OptimizerError> {
        match std::env::var(WORKERS_ENV) {
            Ok(value) => self.with_worker_override(&value),
            Err(_) => Ok(self),
        }
    }

    fn with_worker_override(mut self, value: &str) -> Result<Self, OptimizerError> {
        self.worker_threads = value.trim().parse().map_err(|_| {
            OptimizerError::Config(format!(
                "{} must be a positive integer, got '{}'",
                WORKERS_ENV, value
            ))
        })?;
        self.validated()
    }

    /// Reject settings the worker pool cannot run with.
    pub fn validated(self) -> Result<Self, OptimizerError> {
        if self.worker_threads == 0 {
            return Err(OptimizerError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = OptimizerConfig::default();
        assert!(config.worker_threads >= 1);
        assert_eq!(config.thread_name_prefix, "capital-optimizer");
        assert!(config.log_rounds);
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: OptimizerConfig = serde_json::from_str(r#"{ "worker_threads": 3 }"#).unwrap();
        assert_eq!(config.worker_threads, 3);
        assert_eq!(config.thread_name_prefix, "capital-optimizer");
        assert!(config.log_rounds);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = OptimizerConfig {
            worker_threads: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validated(),
            Err(OptimizerError::Config(_))
        ));
    }

    #[test]
    fn test_worker_override() {
        let config = OptimizerConfig::default().with_worker_override(" 4 ").unwrap();
        assert_eq!(config.worker_threads, 4);

        assert!(OptimizerConfig::default()
            .with_worker_override("many")
            .is_err());
        assert!(OptimizerConfig::default().with_worker_override("0").is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let err = OptimizerConfig::from_json_file("/nonexistent/optimizer.json").unwrap_err();
        assert!(err.to_string().contains("cannot read config"));
    }
}
