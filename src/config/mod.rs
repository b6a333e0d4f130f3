//! Configuration for the `fstree` binary.
//! Provides the settings type, default paths and XML loading.
//! The library operations themselves take no configuration.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{load_config, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FSTREE_CONFIG";
