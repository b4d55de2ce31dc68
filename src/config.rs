use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Smallest accepted `max_turns` for a session.
    pub min_turns: usize,
    /// Largest accepted `max_turns` for a session.
    pub max_turns_limit: usize,
    pub default_max_turns: usize,
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    /// Applied to every single query execution.
    pub execution_timeout: Duration,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            min_turns: 1,
            max_turns_limit: 20,
            default_max_turns: 5,
            cache_capacity: 100,
            cache_ttl: Duration::from_secs(600),
            execution_timeout: Duration::from_secs(30),
        }
    }
}

impl EvaluationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_turns(min_turns: usize, max_turns_limit: usize, default_max_turns: usize) -> Self {
        Self { min_turns, max_turns_limit, default_max_turns, ..Self::default() }
    }

    pub fn with_cache(cache_capacity: usize, cache_ttl: Duration) -> Self {
        Self { cache_capacity, cache_ttl, ..Self::default() }
    }

    pub fn with_execution_timeout(execution_timeout: Duration) -> Self {
        Self { execution_timeout, ..Self::default() }
    }

    pub fn accepts_max_turns(&self, max_turns: usize) -> bool {
        max_turns > 0 && (self.min_turns..=self.max_turns_limit).contains(&max_turns)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::EvaluationConfig;

    #[test]
    pub fn test_defaults() {
        let config = EvaluationConfig::new();
        assert_eq!(config.default_max_turns, 5);
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
        assert!(config.accepts_max_turns(config.default_max_turns));
    }

    #[test]
    pub fn test_max_turns_bounds() {
        let config = EvaluationConfig::with_turns(2, 4, 3);
        assert!(!config.accepts_max_turns(1));
        assert!(config.accepts_max_turns(2));
        assert!(config.accepts_max_turns(4));
        assert!(!config.accepts_max_turns(5));
        assert!(!EvaluationConfig::with_turns(0, 4, 3).accepts_max_turns(0));
    }

    #[test]
    pub fn test_partial_config_deserializes_with_defaults() {
        let config: EvaluationConfig =
            serde_json::from_str(r#"{"cache_capacity": 7}"#).expect("Failed to deserialize");
        assert_eq!(config.cache_capacity, 7);
        assert_eq!(config.default_max_turns, 5);
    }
}
