//! Engine configuration from environment variables

use std::env;
use std::time::Duration;

/// How to launch and drive the evaluation engine
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Path to the engine binary (or "stockfish" if in PATH)
    pub path: String,
    /// Extra command line arguments for the engine
    pub args: Vec<String>,
    /// Default search depth
    pub depth: u8,
    /// Bound on every wait for an engine reply
    pub timeout: Duration,
    /// Maximum number of engines leased at once
    pub pool_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: "stockfish".to_string(),
            args: Vec::new(),
            depth: 12,
            timeout: Duration::from_secs(15),
            pool_size: 2,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with a custom variable lookup
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let path = var("STOCKFISH_PATH").unwrap_or(defaults.path);

        let args = var("ENGINE_ARGS")
            .map(|v| v.split_whitespace().map(String::from).collect())
            .unwrap_or_default();

        let depth = var("ENGINE_DEPTH")
            .and_then(|v| v.parse().ok())
            .filter(|d| *d > 0)
            .unwrap_or(defaults.depth);

        let timeout = var("ENGINE_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let pool_size = var("ENGINE_POOL_SIZE")
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.pool_size);

        Self {
            path,
            args,
            depth,
            timeout,
            pool_size,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.path, "stockfish");
        assert_eq!(config.depth, 12);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.pool_size, 2);
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default()
            .with_path("sh")
            .with_args(["-c", "true"])
            .with_timeout(Duration::from_millis(250))
            .with_pool_size(0);
        assert_eq!(config.path, "sh");
        assert_eq!(config.args, vec!["-c", "true"]);
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.pool_size, 1);
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_vars() {
        let config = EngineConfig::from_vars(lookup(&[
            ("STOCKFISH_PATH", "/usr/games/stockfish"),
            ("ENGINE_ARGS", "--threads 2"),
            ("ENGINE_DEPTH", "18"),
            ("ENGINE_TIMEOUT_SECS", "30"),
            ("ENGINE_POOL_SIZE", "4"),
        ]));
        assert_eq!(config.path, "/usr/games/stockfish");
        assert_eq!(config.args, vec!["--threads", "2"]);
        assert_eq!(config.depth, 18);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.pool_size, 4);
    }

    #[test]
    fn test_zero_and_garbage_fall_back_to_defaults() {
        let config = EngineConfig::from_vars(lookup(&[
            ("ENGINE_DEPTH", "0"),
            ("ENGINE_TIMEOUT_SECS", "0"),
            ("ENGINE_POOL_SIZE", "many"),
        ]));
        assert_eq!(config.depth, 12);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.pool_size, 2);
    }
}
