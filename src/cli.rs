//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Global flags may appear before or after the subcommand.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::ffi::OsString;
use std::path::PathBuf;

use fstree::config::{Config, LogLevel};
use fstree::{MatchSpec, Recursion};

/// CLI for the fstree library.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Enumerate, match, measure, copy and merge-move directory trees"
)]
pub struct Args {
    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, value_parser = clap::value_parser!(LogLevel))]
    pub log_level: Option<LogLevel>,

    /// Also append logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Read settings from this XML file instead of $FSTREE_CONFIG / the default location.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Name filter shared by the listing commands.
#[derive(clap::Args, Debug, Clone)]
pub struct PatternArgs {
    /// Name pattern; a shell glob unless --regex is given.
    #[arg(short, long, default_value = "*")]
    pub pattern: String,

    /// Read the pattern as a regular expression (unanchored search).
    #[arg(long)]
    pub regex: bool,
}

impl PatternArgs {
    pub fn spec(&self) -> MatchSpec {
        if self.regex {
            MatchSpec::regex(self.pattern.clone())
        } else {
            MatchSpec::glob(self.pattern.clone())
        }
    }
}

/// How `list` descends.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecurseMode {
    /// Immediate children only
    #[default]
    None,
    /// Only into directories whose names match
    Matching,
    /// Into every directory
    All,
}

impl From<RecurseMode> for Recursion {
    fn from(m: RecurseMode) -> Self {
        match m {
            RecurseMode::None => Recursion::None,
            RecurseMode::Matching => Recursion::PatternConstrained,
            RecurseMode::All => Recursion::Full,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List entries matching a pattern.
    List {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
        #[command(flatten)]
        pattern: PatternArgs,
        #[arg(short, long, value_enum, default_value_t = RecurseMode::None)]
        recurse: RecurseMode,
        /// Print bare names instead of full paths.
        #[arg(long)]
        names: bool,
    },
    /// Print the shallowest entry matching a pattern.
    Find {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
        #[command(flatten)]
        pattern: PatternArgs,
    },
    /// Count directories, files and bytes.
    Stat {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
        #[command(flatten)]
        pattern: PatternArgs,
        /// Descend into matching subdirectories.
        #[arg(short = 'R', long)]
        recursive: bool,
    },
    /// Copy a file, or every file of a directory tree, into a directory.
    Copy {
        #[arg(value_hint = ValueHint::AnyPath)]
        src: PathBuf,
        #[arg(value_hint = ValueHint::DirPath)]
        dest_dir: PathBuf,
        /// Also copy timestamps.
        #[arg(long)]
        preserve_metadata: bool,
    },
    /// Move a file or directory into a directory.
    Move {
        #[arg(value_hint = ValueHint::AnyPath)]
        src: PathBuf,
        #[arg(value_hint = ValueHint::DirPath)]
        dest_dir: PathBuf,
        /// New name for a moved file.
        #[arg(long)]
        name: Option<OsString>,
    },
    /// Rename to an exact destination, overwriting, with copy fallback.
    Relocate {
        #[arg(value_hint = ValueHint::AnyPath)]
        src: PathBuf,
        #[arg(value_hint = ValueHint::AnyPath)]
        dst: PathBuf,
    },
    /// Merge a directory's contents into another directory.
    Merge {
        #[arg(value_hint = ValueHint::DirPath)]
        src_dir: PathBuf,
        #[arg(value_hint = ValueHint::DirPath)]
        dest_dir: PathBuf,
        /// Merge into DEST_DIR/<name of SRC_DIR> and delete SRC_DIR afterwards.
        #[arg(long)]
        replace: bool,
    },
    /// Report whether a file (or any file under a directory) is locked.
    Locked {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Report whether a directory tree contains no files.
    Empty {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
    },
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(p) = &self.log_file {
            cfg.log_file = Some(p.clone());
        }
        if self.json {
            cfg.json_logs = true;
        }
        if let Command::Copy {
            preserve_metadata: true,
            ..
        } = self.command
        {
            cfg.preserve_metadata = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn debug_beats_log_level() {
        let a = parse_from(&["fstree", "--log-level", "quiet", "-d", "empty", "/x"]);
        assert_eq!(a.effective_log_level(), Some(LogLevel::Debug));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let a = parse_from(&["fstree", "list", "/x", "--json", "-p", "*.txt", "--regex"]);
        assert!(a.json);
        match a.command {
            Command::List { pattern, recurse, .. } => {
                assert_eq!(pattern.spec(), MatchSpec::regex("*.txt"));
                assert_eq!(recurse, RecurseMode::None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn overrides_apply_only_when_set() {
        let mut cfg = Config {
            log_level: LogLevel::Info,
            preserve_metadata: false,
            ..Default::default()
        };
        parse_from(&["fstree", "empty", "/x"]).apply_overrides(&mut cfg);
        assert_eq!(cfg.log_level, LogLevel::Info);

        parse_from(&["fstree", "copy", "a", "b", "--preserve-metadata"]).apply_overrides(&mut cfg);
        assert!(cfg.preserve_metadata);
    }

    #[test]
    fn recurse_modes_map_to_policies() {
        assert_eq!(Recursion::from(RecurseMode::Matching), Recursion::PatternConstrained);
        assert_eq!(Recursion::from(RecurseMode::All), Recursion::Full);
    }

    #[test]
    fn bad_level_is_rejected() {
        assert!(Args::try_parse_from(["fstree", "--log-level", "loud", "empty", "/x"]).is_err());
    }
}
