//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - A missing file means defaults; a malformed file or unknown field is an error.
//!
//! Example:
//! ```xml
//! <config>
//!   <log_level>debug</log_level>
//!   <log_file>/var/log/fstree.log</log_file>
//!   <json_logs>false</json_logs>
//!   <preserve_metadata>true</preserve_metadata>
//! </config>
//! ```

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::config_path;
use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
    #[serde(rename = "json_logs", default, deserialize_with = "de_bool_trimmed_opt")]
    json_logs: Option<bool>,
    #[serde(rename = "preserve_metadata", default, deserialize_with = "de_bool_trimmed_opt")]
    preserve_metadata: Option<bool>,
}

// Booleans written with surrounding whitespace or odd case still parse.
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => match s.as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!("invalid boolean: '{other}'"))),
        },
    }
}

fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = parsed.log_level.as_deref() {
        let s = s.trim();
        if !s.is_empty() {
            cfg.log_level = match s.parse::<LogLevel>() {
                Ok(level) => level,
                Err(e) => bail!(e),
            };
        }
    }
    if let Some(s) = parsed.log_file.as_deref() {
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            cfg.log_file = Some(PathBuf::from(trimmed));
        }
    }
    cfg.json_logs = parsed.json_logs.unwrap_or(false);
    cfg.preserve_metadata = parsed.preserve_metadata.unwrap_or(false);
    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("config xml '{}'", path.display()))
}

/// Resolve and load the config.
///
/// `explicit` (from `--config`) wins over `$FSTREE_CONFIG` and the default
/// location. An explicit file must exist; a missing default file yields defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(p) = explicit {
        return load_config_from_xml_path(p);
    }
    let Some(path) = config_path() else {
        debug!("no config location available; using defaults");
        return Ok(Config::default());
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(Config::default());
    }
    debug!(path = %path.display(), "loading config");
    load_config_from_xml_path(&path)
}
