use std::path::Path;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Offset used when turning session dates into form inputs and back.
    pub utc_offset_minutes: i32,
    /// `tracing_subscriber::EnvFilter` directive, `RUST_LOG` wins when set.
    pub log_filter: String,
    /// Placeholder link sent for files created or renamed from the details screen.
    pub new_file_link: String,
    pub new_file_type: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            log_filter: "info".to_string(),
            new_file_link: "www.newlink.com".to_string(),
            new_file_type: 1,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: Config = serde_json::from_str(&raw)?;
        cfg.offset()?;
        Ok(cfg)
    }

    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .ok_or(ConfigError::Offset(self.utc_offset_minutes))
    }
}
