//! Run settings, taken from the environment.
//!
//! | variable                      | effect                                   |
//! |-------------------------------|------------------------------------------|
//! | `MCP_SETUP_CONFIG_DIR`        | write the config into this directory     |
//! | `MCP_SETUP_HTTP_TIMEOUT_SECS` | per-endpoint reachability timeout        |
//! | `MCP_SETUP_NO_PAUSE`          | skip the "press ENTER" pause on Windows  |
//! | `MCP_SETUP_LOG`               | tracing filter (read by the binary)      |

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::reachability::DEFAULT_TIMEOUT;

pub const CONFIG_DIR_ENV: &str = "MCP_SETUP_CONFIG_DIR";
pub const HTTP_TIMEOUT_ENV: &str = "MCP_SETUP_HTTP_TIMEOUT_SECS";
pub const NO_PAUSE_ENV: &str = "MCP_SETUP_NO_PAUSE";
pub const LOG_ENV: &str = "MCP_SETUP_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub config_dir_override: Option<PathBuf>,
    pub http_timeout: Duration,
    pub pause_before_exit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            config_dir_override: None,
            http_timeout: DEFAULT_TIMEOUT,
            pause_before_exit: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Settings {
        Settings::from_lookup(|key| std::env::var_os(key))
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut settings = Settings::default();

        if let Some(dir) = lookup(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            settings.config_dir_override = Some(PathBuf::from(dir));
        }

        if let Some(raw) = lookup(HTTP_TIMEOUT_ENV) {
            match raw.to_string_lossy().trim().parse::<u64>() {
                Ok(secs) if secs > 0 => settings.http_timeout = Duration::from_secs(secs),
                _ => warn!(
                    "ignoring {}={:?}, using {}s",
                    HTTP_TIMEOUT_ENV,
                    raw,
                    DEFAULT_TIMEOUT.as_secs()
                ),
            }
        }

        if lookup(NO_PAUSE_ENV).is_some_and(|v| !v.is_empty()) {
            settings.pause_before_exit = false;
        }

        settings
    }
}
