//! Consistency-check and logging configuration.

use serde::{Deserialize, Serialize};

/// Timing of the shell's periodic compositor/UI consistency check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsistencyConfig {
    /// Interval between checks in milliseconds (valid range: 50-10000).
    pub check_interval_ms: u64,
    /// Delay before re-verifying after the UI switches to settings
    /// (valid range: 10-5000).
    pub recheck_delay_ms: u64,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: 200,
            recheck_delay_ms: 100,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The `tracing` filter directive for this level.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "wtstation=trace",
            LogLevel::Debug => "wtstation=debug",
            LogLevel::Info => "wtstation=info",
            LogLevel::Warn => "wtstation=warn",
            LogLevel::Error => "wtstation=error",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
