//! Application orchestrator.
//! Loads/merges config, initializes logging, and dispatches the subcommand
//! onto the library operation of the same name.

use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::{debug, error, info};

use fstree::config::load_config;
use fstree::{
    copy_file_with, copy_tree_with, enumerate_tree, find_first_match, find_locked_files, is_dir,
    is_empty_directory, is_locked, merge_tree_into, move_either, move_file, path_exists,
    rename_overwrite, replace_tree_with, stat_tree,
};

use crate::cli::{Args, Command};
use crate::logging::init_tracing;
use crate::output as out;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Config file values first, CLI flags win.
    let mut cfg = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut cfg);

    // Held until return so the file appender flushes.
    let _guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), cfg.json_logs)
        .context("initialize logging")?;
    debug!(?args, ?cfg, "starting fstree");

    match &args.command {
        Command::List {
            path,
            pattern,
            recurse,
            names,
        } => {
            for p in enumerate_tree(path, &pattern.spec(), (*recurse).into()) {
                let shown = if *names {
                    p.file_name().map(Path::new).unwrap_or(p.as_path()).display().to_string()
                } else {
                    p.display().to_string()
                };
                out::print_user(&shown);
            }
            Ok(())
        }
        Command::Find { path, pattern } => match find_first_match(path, &pattern.spec()) {
            Some(hit) => {
                out::print_user(&hit.display().to_string());
                Ok(())
            }
            None => bail!("no entry under {} matches '{}'", path.display(), pattern.pattern),
        },
        Command::Stat {
            path,
            pattern,
            recursive,
        } => {
            let s = stat_tree(path, &pattern.spec(), *recursive)?;
            out::print_user(&format!(
                "directories={} files={} bytes={}",
                s.subdirectories, s.files, s.bytes
            ));
            Ok(())
        }
        Command::Copy { src, dest_dir, .. } => {
            let copied = if is_dir(src) {
                copy_tree_with(src, dest_dir, cfg.preserve_metadata)?
            } else {
                copy_file_with(src, dest_dir, cfg.preserve_metadata)?;
                1
            };
            info!(src = %src.display(), dest = %dest_dir.display(), files = copied, "copy completed");
            Ok(())
        }
        Command::Move {
            src,
            dest_dir,
            name,
        } => {
            if !path_exists(src) {
                bail!("source does not exist: {}", src.display());
            }
            let moved = match name {
                Some(n) => move_file(src, dest_dir, Some(n.as_os_str())),
                None => move_either(src, dest_dir),
            };
            if !moved {
                error!(src = %src.display(), dest = %dest_dir.display(), "move failed");
                bail!("could not move {} into {}", src.display(), dest_dir.display());
            }
            Ok(())
        }
        Command::Relocate { src, dst } => {
            rename_overwrite(src, dst)?;
            Ok(())
        }
        Command::Merge {
            src_dir,
            dest_dir,
            replace,
        } => {
            if !is_dir(src_dir) {
                bail!("not a directory: {}", src_dir.display());
            }
            let outcome = if *replace {
                replace_tree_with(src_dir, dest_dir)?
            } else {
                merge_tree_into(src_dir, dest_dir)?
            };
            if outcome.is_success() {
                return Ok(());
            }
            for rel in outcome.failures() {
                out::print_user(&rel.display().to_string());
            }
            bail!(
                "{} file(s) could not be moved; source kept",
                outcome.failures().len()
            )
        }
        Command::Locked { path } => {
            if is_dir(path) {
                for rel in find_locked_files(path) {
                    out::print_user(&rel.display().to_string());
                }
            } else {
                out::print_user(if is_locked(path) { "locked" } else { "unlocked" });
            }
            Ok(())
        }
        Command::Empty { path } => {
            let empty = is_empty_directory(path)?;
            out::print_user(if empty { "empty" } else { "not empty" });
            Ok(())
        }
    }
}
