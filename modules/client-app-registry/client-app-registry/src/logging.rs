//! Tracing subscriber setup from [`LoggingConfig`].
//!
//! Console output goes to non-blocking stderr in human format. When the
//! `default` section names a file, records are also written there as JSON
//! lines through a size-rotated writer. Sections other than `default` set
//! per-target levels for both sinks; only the `default` file is opened.
//! `RUST_LOG`, when set, caps both sinks.

use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{Context, Result};
use file_rotate::compression::Compression;
use file_rotate::suffix::{AppendTimestamp, FileLimit};
use file_rotate::{ContentLimit, FileRotate};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{LoggingConfig, Section};

static CONSOLE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const NOISY_TARGETS: &[&str] = &["h2", "hyper_util", "rustls"];

/// Install the global subscriber. A second call leaves the first subscriber
/// in place.
///
/// # Errors
/// Returns an error if the log file directory cannot be created.
pub fn init_logging(cfg: &LoggingConfig, base_dir: &Path) -> Result<()> {
    // Already-installed bridge is fine.
    _ = tracing_log::LogTracer::init();

    let default_section = cfg.get(DEFAULT_SECTION);
    let file_writer = default_section
        .map(|section| open_log_file(section, base_dir))
        .transpose()?
        .flatten();

    let console_targets = console_targets(cfg);
    let file_targets = file_targets(cfg, file_writer.is_some());

    let (stderr, guard) = tracing_appender::non_blocking(io::stderr());
    _ = CONSOLE_GUARD.set(guard);

    let console_layer = fmt::layer()
        .with_writer(stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(writer)
            .with_filter(file_targets)
    });

    _ = Registry::default()
        .with(EnvFilter::try_from_default_env().ok())
        .with(console_layer)
        .with(file_layer)
        .try_init();

    Ok(())
}

fn sections(cfg: &LoggingConfig) -> impl Iterator<Item = (&str, &Section)> {
    cfg.iter()
        .filter(|(target, _)| target.as_str() != DEFAULT_SECTION)
        .map(|(target, section)| (target.as_str(), section))
}

pub(crate) fn console_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .map_or(LevelFilter::INFO, |s| level_filter(s.console_level));

    let mut targets = Targets::new().with_default(default);
    for target in NOISY_TARGETS {
        targets = targets.with_target(*target, LevelFilter::WARN);
    }
    for (target, section) in sections(cfg) {
        targets = targets.with_target(target, level_filter(section.console_level));
    }
    targets
}

pub(crate) fn file_targets(cfg: &LoggingConfig, has_file: bool) -> Targets {
    if !has_file {
        return Targets::new().with_default(LevelFilter::OFF);
    }

    let default = cfg
        .get(DEFAULT_SECTION)
        .map_or(LevelFilter::INFO, |s| level_filter(s.file_level));

    sections(cfg).fold(Targets::new().with_default(default), |targets, (target, section)| {
        targets.with_target(target, level_filter(section.file_level))
    })
}

fn level_filter(level: Option<tracing::Level>) -> LevelFilter {
    level.map_or(LevelFilter::OFF, LevelFilter::from_level)
}

fn open_log_file(section: &Section, base_dir: &Path) -> Result<Option<RotatingFile>> {
    let Some(file) = section.file() else {
        return Ok(None);
    };

    let path = Path::new(file);
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let limit = match (section.max_backups, section.max_age_days) {
        (Some(n), _) => FileLimit::MaxFiles(n),
        (None, Some(days)) => FileLimit::Age(
            chrono::Duration::try_days(i64::from(days))
                .with_context(|| format!("Invalid max_age_days: {days}"))?,
        ),
        (None, None) => FileLimit::MaxFiles(1),
    };
    let max_bytes = usize::try_from(
        section
            .max_size_mb
            .unwrap_or(DEFAULT_MAX_SIZE_MB)
            .saturating_mul(1024 * 1024),
    )
    .unwrap_or(usize::MAX);

    let rotate = FileRotate::new(
        &path,
        AppendTimestamp::default(limit),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        None,
    );
    Ok(Some(RotatingFile(Arc::new(Mutex::new(rotate)))))
}

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl<'a> fmt::MakeWriter<'a> for RotatingFile {
    type Writer = RotatingFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|e| io::Error::other(format!("log file lock poisoned: {e}")))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0
            .lock()
            .map_err(|e| io::Error::other(format!("log file lock poisoned: {e}")))?
            .flush()
    }
}
