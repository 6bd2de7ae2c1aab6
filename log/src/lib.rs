//! Logging setup for piecework: stderr output plus an optional log file.
//!
//! ## Environment Variables
//!
//! 1. **`PIECEWORK_LOG`** (highest priority) - piecework-specific logging control
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for piecework crates
//!
//! A bare level such as `PIECEWORK_LOG=trace` applies to every piecework crate.
//! Anything containing `=`, `:` or `,` is passed through as a full filter.
//!
//! ## Log File
//!
//! Only written when [`LogConfig::log_file_path`] is set. The file defaults to
//! `warn` unless one of the variables above is set. A path without an extension
//! is treated as a directory and gets `piecework-<pid>.log` inside it.

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Crates whose targets a bare `PIECEWORK_LOG` level expands to.
const CRATES: &[&str] = &["piecework_text", "piecework_bin", "piecework"];

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program --
/// dropping it flushes and stops the background file writer.
pub fn init(config: LogConfig) -> Result<LogGuard, Error> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(create_filter()?);

    let Some((log_dir, filename)) = config.log_file_path.map(resolve_log_path) else {
        Registry::default().with(stderr_layer).try_init()?;
        return Ok(LogGuard {
            _file_guard: None,
            log_file: None,
        });
    };

    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_file_filter()?);

    Registry::default()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: Some(file_guard),
        log_file: Some(log_dir.join(filename)),
    })
}

/// Initialize logging for tests.
///
/// Stdout only, captured by the test harness. Safe to call from every test; only
/// the first call installs a subscriber.
#[allow(clippy::let_unit_value)]
pub fn test() {
    let _ = test_init();
}

fn test_init() -> Result<(), Error> {
    fmt()
        .with_env_filter(create_filter()?)
        .with_test_writer()
        .try_init()?;
    Ok(())
}

/// Split a configured path into the directory and file name to write to.
fn resolve_log_path(path: PathBuf) -> (PathBuf, String) {
    let default_name = format!("piecework-{}.log", std::process::id());

    if path.extension().is_none() {
        return (path, default_name);
    }

    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(default_name);
    (dir, name)
}

/// File filter: uses the user-specified level if set, otherwise `warn`.
fn create_file_filter() -> Result<EnvFilter, Error> {
    if env::var("PIECEWORK_LOG").is_ok() || env::var("RUST_LOG").is_ok() {
        return create_filter();
    }
    Ok(EnvFilter::new("warn"))
}

/// Create the [`EnvFilter`] for the current environment.
fn create_filter() -> Result<EnvFilter, Error> {
    filter_from(
        env::var("PIECEWORK_LOG").ok().as_deref(),
        env::var("RUST_LOG").ok().as_deref(),
    )
}

fn filter_from(piecework_log: Option<&str>, rust_log: Option<&str>) -> Result<EnvFilter, Error> {
    let directives = match (piecework_log, rust_log) {
        (Some(level), _) => expand_piecework_log(level),
        (None, Some(rust_log)) => rust_log.to_string(),
        (None, None) => expand_piecework_log("info"),
    };
    Ok(EnvFilter::try_new(directives)?)
}

/// Expand a `PIECEWORK_LOG` value into a full filter string.
///
/// - `debug` becomes `warn,piecework_text=debug,piecework_bin=debug,...`
/// - `piecework_text=trace` is used as-is
fn expand_piecework_log(value: &str) -> String {
    if value.contains('=') || value.contains(':') || value.contains(',') {
        return value.to_string();
    }

    let mut directives = String::from("warn");
    for name in CRATES {
        directives.push_str(&format!(",{name}={value}"));
    }
    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_expands_to_every_crate() {
        assert_eq!(
            expand_piecework_log("trace"),
            "warn,piecework_text=trace,piecework_bin=trace,piecework=trace"
        );
    }

    #[test]
    fn module_syntax_passes_through() {
        assert_eq!(
            expand_piecework_log("piecework_text=debug"),
            "piecework_text=debug"
        );
        assert_eq!(expand_piecework_log("info,hyper=off"), "info,hyper=off");
    }

    #[test]
    fn piecework_log_wins_over_rust_log() {
        let filter = filter_from(Some("debug"), Some("error")).expect("valid filter");
        assert!(filter.to_string().contains("piecework_text=debug"));

        let filter = filter_from(None, Some("error")).expect("valid filter");
        assert_eq!(filter.to_string(), "error");
    }

    #[test]
    fn invalid_filter_is_an_error() {
        assert!(filter_from(None, Some("piecework_text=notalevel")).is_err());
    }

    #[test]
    fn log_path_with_extension_is_a_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("edits.log");

        let (log_dir, name) = resolve_log_path(path);
        assert_eq!(log_dir, dir.path());
        assert_eq!(name, "edits.log");
    }

    #[test]
    fn log_path_without_extension_is_a_directory() {
        let dir = tempfile::tempdir().expect("temp dir");

        let (log_dir, name) = resolve_log_path(dir.path().join("logs"));
        assert_eq!(log_dir, dir.path().join("logs"));
        assert_eq!(name, format!("piecework-{}.log", std::process::id()));
    }

    #[test]
    fn bare_file_name_goes_in_current_dir() {
        let (log_dir, name) = resolve_log_path(PathBuf::from("session.log"));
        assert_eq!(log_dir, Path::new("."));
        assert_eq!(name, "session.log");
    }

    #[test]
    fn test_init_is_idempotent() {
        test();
        test();
        tracing::info!("still running after double init");
    }
}
