//! Application state

use chrono::{DateTime, Utc};

use crate::engine::JudgmentEngine;

use super::ServerConfig;

/// State shared across handlers. Everything inside is read-only after
/// startup, so handlers never take a lock.
pub struct AppState {
    pub config: ServerConfig,
    pub engine: JudgmentEngine,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig, engine: JudgmentEngine) -> Self {
        Self {
            config,
            engine,
            started_at: Utc::now(),
        }
    }
}
