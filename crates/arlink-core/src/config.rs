use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

use crate::error::{ShellError, ShellResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Readiness re-check interval.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    #[serde(default = "default_notice_text")]
    pub notice_text: String,

    #[serde(default = "default_prefs_path")]
    pub prefs_path: String,

    /// Raw engine options applied before launch negotiation.
    #[serde(default)]
    pub startup_args: String,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_frame_interval_ms() -> u64 {
    16
}
fn default_notice_text() -> String {
    "Searching for surfaces...".to_string()
}
fn default_prefs_path() -> String {
    "arlink-prefs.toml".to_string()
}
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            frame_interval_ms: default_frame_interval_ms(),
            notice_text: default_notice_text(),
            prefs_path: default_prefs_path(),
            startup_args: String::new(),
            log_filter: default_log_filter(),
        }
    }
}

impl ShellConfig {
    pub fn load_or_default(path: &str) -> ShellResult<Self> {
        match fs::read_to_string(path) {
            Ok(s) => {
                let cfg: ShellConfig = toml::from_str(&s)
                    .map_err(|e| ShellError::Config(format!("parse {}: {}", path, e)))?;
                Ok(cfg)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    #[inline]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}
