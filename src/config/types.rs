//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// Per-entry decisions
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime settings for the binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Emit JSON lines instead of compact text
    pub json_logs: bool,
    /// `copy` also carries timestamps, not only permission bits
    pub preserve_metadata: bool,
}
