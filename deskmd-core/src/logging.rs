//! Process-wide tracing setup.
//!
//! [`Logging::init`] installs the global subscriber on first use. Later calls
//! only swap the level filter through a reload handle, so interactive mode can
//! call it once per question without stacking writers.

use once_cell::sync::OnceCell;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

pub const LEVEL_ENV: &str = "CLIENT_LOG_LEVEL";
pub const FILE_ENV: &str = "CLIENT_LOG_FILE";
pub const STDERR_ENV: &str = "CLIENT_LOG_STDERR";

type FilterHandle = reload::Handle<EnvFilter, Registry>;

static FILTER: OnceCell<FilterHandle> = OnceCell::new();

/// Where and how verbosely to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub file: Option<PathBuf>,
    pub stderr: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            file: None,
            stderr: true,
        }
    }
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            level: parse_level(lookup(LEVEL_ENV).as_deref()),
            file: lookup(FILE_ENV)
                .map(|path| path.trim().to_string())
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            stderr: truthy(lookup(STDERR_ENV).as_deref(), true),
        }
    }
}

/// Unknown or missing names fall back to INFO.
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    match value.map(|v| v.trim().to_ascii_uppercase()).as_deref() {
        Some("TRACE") => LevelFilter::TRACE,
        Some("DEBUG") => LevelFilter::DEBUG,
        Some("INFO") => LevelFilter::INFO,
        Some("WARN") | Some("WARNING") => LevelFilter::WARN,
        Some("ERROR") | Some("CRITICAL") => LevelFilter::ERROR,
        Some("OFF") => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

pub fn truthy(value: Option<&str>, default: bool) -> bool {
    match value {
        None => default,
        Some(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "y" | "on"
        ),
    }
}

/// Handle to the installed subscriber. Keep it alive in `main`: dropping the
/// first instance flushes and stops the file writer.
#[must_use = "dropping Logging stops the log file writer"]
pub struct Logging {
    _guard: Option<WorkerGuard>,
}

impl Logging {
    pub fn init(settings: &LogSettings) -> Self {
        if let Some(handle) = FILTER.get() {
            let level = settings.level;
            let _ = handle.modify(|filter| *filter = filter_for(level));
            return Self { _guard: None };
        }

        let (filter, handle) = reload::Layer::new(filter_for(settings.level));

        let (file, file_error) = match settings.file.as_ref().map(open_log_file) {
            Some(Ok(file)) => (Some(file), None),
            Some(Err(err)) => (None, Some(err)),
            None => (None, None),
        };
        let (file_layer, guard) = match file {
            Some(file) => {
                let (writer, guard) = tracing_appender::non_blocking(file);
                let layer = fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(false);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };
        // An unwritable log file must not silence everything.
        let stderr_enabled = settings.stderr || (file_layer.is_none() && file_error.is_some());
        let stderr_layer = stderr_enabled.then(|| {
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true)
        });

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer)
            .try_init()
            .is_ok();

        if installed {
            let _ = FILTER.set(handle);
        }
        if let (Some(err), Some(path)) = (file_error, settings.file.as_ref()) {
            warn!(path = %path.display(), %err, "Cannot write log file; logging to stderr only");
        }

        Self { _guard: guard }
    }
}

fn filter_for(level: LevelFilter) -> EnvFilter {
    EnvFilter::default().add_directive(level.into())
}

fn open_log_file(path: &PathBuf) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Single-line-friendly preview of a possibly long text for log events.
pub fn preview(text: &str, limit: usize) -> String {
    let normalized = text.replace("\r\n", "\n");
    let total = normalized.chars().count();
    if total <= limit {
        return normalized;
    }
    let head: String = normalized.chars().take(limit).collect();
    format!("{head}... (truncated, original length={total})")
}
