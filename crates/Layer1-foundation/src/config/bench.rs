//! BenchConfig - 통합 설정
//!
//! 시작 시 한 번 로드된 후 변경되지 않으며, 각 테스터에 생성자로 주입됩니다.

use super::script::{MultiAgentScript, SingleAgentScript};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable overriding `test_config.base_url`
pub const BASE_URL_ENV: &str = "PC_NODE_URL";

/// 내장 기본 설정 (19턴 단일 에이전트, 20턴 3인 다중 에이전트)
const BUILTIN_CONFIG: &str = include_str!("../../configs/default.json");

// ============================================================================
// TestConfig
// ============================================================================

/// Connection and model parameters shared by every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
    /// Target service root, e.g. `http://localhost:3000`
    pub base_url: String,

    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Pause after every request, in seconds
    #[serde(default = "default_delay")]
    pub delay_between_requests: f64,

    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// USD per 1K tokens, used for the cost estimate
    #[serde(default = "default_cost_per_1k")]
    pub cost_per_1k_tokens: f64,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    150
}

fn default_delay() -> f64 {
    0.1
}

fn default_timeout() -> u64 {
    60
}

fn default_cost_per_1k() -> f64 {
    0.002
}

impl TestConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_between_requests.max(0.0))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            delay_between_requests: default_delay(),
            request_timeout_secs: default_timeout(),
            cost_per_1k_tokens: default_cost_per_1k(),
        }
    }
}

// ============================================================================
// BenchConfig
// ============================================================================

/// Complete benchmark configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    pub test_config: TestConfig,
    pub single_agent: SingleAgentScript,
    pub multi_agent: MultiAgentScript,
}

impl BenchConfig {
    // ========================================================================
    // Load
    // ========================================================================

    /// Built-in scripts shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_CONFIG)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: BenchConfig = serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json_str(&content)?;
        info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Load from `path` if given, otherwise the built-in config
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    // ========================================================================
    // Overrides
    // ========================================================================

    /// Apply `PC_NODE_URL` if set
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                debug!("{} overrides base_url: {}", BASE_URL_ENV, url);
                self.test_config.base_url = url;
            }
        }
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.test_config.base_url = base_url.into();
        self
    }

    /// Truncate both scripts to at most `rounds` turns
    pub fn quick(mut self, rounds: usize) -> Self {
        self.single_agent = self.single_agent.truncated(rounds);
        self.multi_agent = self.multi_agent.truncated(rounds);
        self
    }

    // ========================================================================
    // Validation
    // ========================================================================

    pub fn validate(&self) -> Result<()> {
        let tc = &self.test_config;

        if tc.base_url.trim().is_empty() {
            return Err(Error::Validation("base_url must not be empty".to_string()));
        }
        if tc.model.trim().is_empty() {
            return Err(Error::Validation("model must not be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&tc.temperature) {
            return Err(Error::Validation(format!(
                "temperature must be within 0..=2, got {}",
                tc.temperature
            )));
        }
        if tc.max_tokens == 0 {
            return Err(Error::Validation("max_tokens must be positive".to_string()));
        }
        if !tc.delay_between_requests.is_finite() || tc.delay_between_requests < 0.0 {
            return Err(Error::Validation(
                "delay_between_requests must be a non-negative number".to_string(),
            ));
        }
        if !tc.cost_per_1k_tokens.is_finite() || tc.cost_per_1k_tokens < 0.0 {
            return Err(Error::Validation(
                "cost_per_1k_tokens must be a non-negative number".to_string(),
            ));
        }

        if self.single_agent.is_empty() {
            return Err(Error::Validation(
                "single_agent.messages must not be empty".to_string(),
            ));
        }

        let multi = &self.multi_agent;
        if multi.is_empty() {
            return Err(Error::Validation(
                "multi_agent.turns must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for agent in &multi.agents {
            if !seen.insert(agent.id.as_str()) {
                return Err(Error::Validation(format!(
                    "duplicate agent id: {}",
                    agent.id
                )));
            }
        }

        for (i, turn) in multi.turns.iter().enumerate() {
            if !seen.contains(turn.agent.as_str()) {
                return Err(Error::Validation(format!(
                    "turn {} references undeclared agent '{}'",
                    i + 1,
                    turn.agent
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_config() {
        let config = BenchConfig::builtin().unwrap();
        assert_eq!(config.single_agent.len(), 19);
        assert_eq!(config.multi_agent.len(), 20);
        assert_eq!(config.multi_agent.agents.len(), 3);
        assert_eq!(config.test_config.max_tokens, 150);
    }

    #[test]
    fn test_quick_truncates_scripts() {
        let config = BenchConfig::builtin().unwrap().quick(3);
        assert_eq!(config.single_agent.len(), 3);
        assert_eq!(config.multi_agent.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_undeclared_agent_rejected() {
        let mut config = BenchConfig::builtin().unwrap();
        config.multi_agent.turns[0].agent = "ghost".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_duplicate_agent_rejected() {
        let mut config = BenchConfig::builtin().unwrap();
        let dup = config.multi_agent.agents[0].clone();
        config.multi_agent.agents.push(dup);
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let mut config = BenchConfig::builtin().unwrap();
        config.test_config.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bench.json");
        std::fs::write(
            &path,
            r#"{
                "test_config": {"base_url": "http://node:9000", "model": "m"},
                "single_agent": {"scenario": "s", "messages": ["a", "b"]},
                "multi_agent": {
                    "scenario": "m",
                    "agents": [{"id": "x", "name": "X"}],
                    "turns": [{"agent": "x", "message": "hello"}]
                }
            }"#,
        )
        .unwrap();

        let config = BenchConfig::load(&path).unwrap();
        assert_eq!(config.test_config.base_url, "http://node:9000");
        assert_eq!(config.test_config.max_tokens, 150);
        assert_eq!(config.test_config.delay().as_millis(), 100);
        assert!(config.multi_agent.context_group.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = BenchConfig::load(Path::new("/nonexistent/bench.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_with_base_url() {
        let config = BenchConfig::builtin()
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        assert_eq!(config.test_config.base_url, "http://127.0.0.1:1");
    }
}
