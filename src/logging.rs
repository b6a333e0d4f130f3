//! Tracing initialization.
//! Builds a subscriber with EnvFilter, supports compact or JSON formats, and optional file logging.
//!
//! Behavior:
//! - Log level is driven by LogLevel (no RUST_LOG override here).
//! - Console logs go to stderr so stdout stays clean for listings.
//! - If `log_file` is provided and passes safety checks, a non-blocking file layer is added.
//!
//! File logging is refused if any ancestor of the file path is a symlink.

use anyhow::Result;
use chrono::Local;
use fstree::config::{LogLevel, default_log_path, path_has_symlink_ancestor};
use fstree::platform::open_log_file_secure_append;
use std::fmt as stdfmt;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::{Registry, registry};
use tracing_subscriber::util::SubscriberInitExt;

use crate::output as out;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Human-friendly timestamp formatter (DD/MM/YY HH:MM:SS)
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%d/%m/%y %H:%M:%S"))
    }
}

#[inline]
fn to_level_filter(lvl: LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::INFO,
        LogLevel::Info => LevelFilter::DEBUG,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

#[inline]
fn env_filter_from_level(level_filter: LevelFilter) -> EnvFilter {
    EnvFilter::new(level_filter.to_string().to_lowercase())
}

fn fmt_layer<W>(writer: W, json: bool, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if json {
        tsfmt::layer()
            .event_format(tsfmt::format().json())
            .with_timer(LocalHumanTime)
            .with_level(true)
            .with_target(true)
            .with_writer(writer)
            .boxed()
    } else {
        tsfmt::layer()
            .with_timer(LocalHumanTime)
            .with_level(true)
            .with_target(false)
            .with_ansi(ansi)
            .compact()
            .with_writer(writer)
            .boxed()
    }
}

/// Try to open a non-blocking file writer for logging:
/// - Refuse if any ancestor is a symlink (prints a warning and returns None)
/// - Best-effort create parent directory
/// - Open file for append and wrap with non_blocking
fn maybe_open_non_blocking_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(true) => {
            out::print_warn(&format!(
                "refusing file logging: an ancestor of {} is a symlink",
                path.display()
            ));
            return None;
        }
        Err(e) => {
            out::print_warn(&format!("cannot check log path {}: {e}", path.display()));
            return None;
        }
        Ok(false) => {}
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let _ = std::fs::create_dir_all(parent);
    }

    match open_log_file_secure_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            out::print_warn(&format!("cannot open log file {}: {e}", path.display()));
            None
        }
    }
}

/// Initialize tracing based on LogLevel and format. Returns an optional WorkerGuard
/// if a file appender is created (must be held until exit to flush logs).
pub fn init_tracing(lvl: LogLevel, log_file: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    let env_filter = env_filter_from_level(to_level_filter(lvl));
    let ansi = atty::is(atty::Stream::Stderr);

    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(std::io::stderr, json, ansi)];
    let mut guard = None;

    if let Some(path) = log_file {
        match maybe_open_non_blocking_writer(path) {
            Some((writer, g)) => {
                layers.push(fmt_layer(writer, json, false));
                guard = Some(g);
            }
            None => {
                out::print_warn(&format!(
                    "file logging to '{}' not enabled; logs continue on stderr",
                    path.display()
                ));
                if let Some(def) = default_log_path() {
                    out::print_warn(&format!("the default log location is {}", def.display()));
                }
            }
        }
    }

    registry().with(layers).with(env_filter).try_init()?;
    Ok(guard)
}
