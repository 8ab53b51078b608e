//! Server configuration from environment variables

use std::env;
use std::time::Duration;

use chess_review_core::EngineConfig;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind_addr: String,
    /// Optional bound on a whole game review
    pub deadline: Option<Duration>,
    pub engine: EngineConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

        let deadline = env::var("REVIEW_DEADLINE_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            bind_addr,
            deadline,
            engine: EngineConfig::from_env(),
        }
    }
}
