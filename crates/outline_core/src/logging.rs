//! Rolling file logs for the editor process.
//!
//! # Responsibility
//! - Start one `flexi_logger` backend per process and report its settings.
//! - Record panics as a single sanitized line before the default hook runs.
//!
//! # Invariants
//! - Outline text never reaches the log; events carry ids, counts, durations.
//! - A second `init_logging` call with the same settings is a no-op; any
//!   other settings are refused.
//! - Nothing in here panics.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;

const LOG_BASENAME: &str = "outline";
const LOG_DIR_NAME: &str = "outline-logs";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEPT_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unsupported log level `{other}`; expected trace|debug|info|warn|error"
            )),
        }
    }
}

/// Validated `init_logging` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    level: LogLevel,
    dir: PathBuf,
}

impl LogSettings {
    fn parse(level: &str, dir: &str) -> Result<Self, String> {
        let level = level.parse()?;
        let trimmed = dir.trim();
        if trimmed.is_empty() {
            return Err("log directory cannot be empty".to_string());
        }
        let dir = Path::new(trimmed);
        if !dir.is_absolute() {
            return Err(format!("log directory must be absolute, got `{trimmed}`"));
        }
        Ok(Self {
            level,
            dir: dir.to_path_buf(),
        })
    }

    /// Describes why `requested` cannot replace these settings.
    fn conflict_with(&self, requested: &LogSettings) -> Option<String> {
        if self.dir != requested.dir {
            return Some(format!(
                "logging already writes to `{}`; refusing to switch to `{}`",
                self.dir.display(),
                requested.dir.display()
            ));
        }
        if self.level != requested.level {
            return Some(format!(
                "logging already runs at `{}`; refusing to switch to `{}`",
                self.level.as_str(),
                requested.level.as_str()
            ));
        }
        None
    }

    fn start(&self) -> Result<LoggerHandle, String> {
        std::fs::create_dir_all(&self.dir).map_err(|err| {
            format!("cannot create log directory `{}`: {err}", self.dir.display())
        })?;

        Logger::try_with_str(self.level.as_str())
            .map_err(|err| format!("invalid log level `{}`: {err}", self.level.as_str()))?
            .log_to_file(
                FileSpec::default()
                    .directory(self.dir.as_path())
                    .basename(LOG_BASENAME),
            )
            .rotate(
                Criterion::Size(ROTATE_AT_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(KEPT_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|err| format!("cannot start logger: {err}"))
    }
}

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

/// Starts rolling file logs under `log_dir` at `level`.
///
/// # Errors
/// Returns a message for stderr when the level is unknown, the directory is
/// empty, relative, or cannot be created, the backend fails to start, or
/// logging is already active with different settings.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let requested = LogSettings::parse(level, log_dir)?;

    let active = ACTIVE.get_or_try_init(|| -> Result<ActiveLogger, String> {
        let handle = requested.start()?;
        install_panic_hook();
        info!(
            "event=app_start module=core status=ok platform={} build_mode={} version={} pid={}",
            std::env::consts::OS,
            if cfg!(debug_assertions) { "debug" } else { "release" },
            env!("CARGO_PKG_VERSION"),
            std::process::id()
        );
        info!(
            "event=core_init module=core status=ok level={} log_dir={}",
            requested.level.as_str(),
            requested.dir.display()
        );
        Ok(ActiveLogger {
            settings: requested.clone(),
            _handle: handle,
        })
    })?;

    match active.settings.conflict_with(&requested) {
        Some(conflict) => Err(conflict),
        None => Ok(()),
    }
}

/// `(level, log_dir)` of the active logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.settings.level.as_str(), active.settings.dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        LogLevel::Debug.as_str()
    } else {
        LogLevel::Info.as_str()
    }
}

/// `<system temp dir>/outline-logs`.
pub fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join(LOG_DIR_NAME)
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            panic_payload(info)
        );
        previous(info);
    }));
}

/// Panic payloads may quote node text: one line, capped.
fn panic_payload(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    single_line(&payload, PANIC_PAYLOAD_LIMIT)
}

fn single_line(value: &str, limit: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= limit {
        return flat;
    }
    let mut capped: String = flat.chars().take(limit).collect();
    capped.push_str("...");
    capped
}

#[cfg(test)]
mod tests {
    use super::{
        default_log_dir, default_log_level, init_logging, logging_status, single_line, LogLevel,
        LogSettings,
    };
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "outline-logging-{tag}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn levels_parse_case_and_alias_insensitively() {
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!(" warning ".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        let error = "verbose".parse::<LogLevel>().unwrap_err();
        assert!(error.contains("trace|debug|info|warn|error"));
    }

    #[test]
    fn default_level_is_a_known_level() {
        assert!(default_log_level().parse::<LogLevel>().is_ok());
    }

    #[test]
    fn settings_require_an_absolute_directory() {
        assert!(LogSettings::parse("info", "logs/dev")
            .unwrap_err()
            .contains("absolute"));
        assert!(LogSettings::parse("info", "  ").unwrap_err().contains("empty"));

        let dir = default_log_dir();
        assert!(dir.ends_with("outline-logs"));
        let settings = LogSettings::parse("info", dir.to_str().unwrap()).unwrap();
        assert_eq!(settings.dir, dir);
    }

    #[test]
    fn conflicts_name_the_changed_setting() {
        let active = LogSettings::parse("info", "/var/log/outline").unwrap();
        let same = active.clone();
        let louder = LogSettings::parse("debug", "/var/log/outline").unwrap();
        let moved = LogSettings::parse("info", "/tmp/outline").unwrap();

        assert_eq!(active.conflict_with(&same), None);
        assert!(active.conflict_with(&louder).unwrap().contains("`debug`"));
        assert!(active.conflict_with(&moved).unwrap().contains("/tmp/outline"));
    }

    #[test]
    fn single_line_flattens_and_caps() {
        let flat = single_line("line1\nline2\rline3", 8);
        assert!(!flat.contains('\n') && !flat.contains('\r'));
        assert!(flat.ends_with("..."));
        assert_eq!(single_line("index out of range", 64), "index out of range");
    }

    #[test]
    fn init_logging_is_idempotent_and_refuses_other_settings() {
        let dir = scratch_dir("active");
        let other = scratch_dir("other");
        let dir_str = dir.to_str().unwrap();

        init_logging("info", dir_str).unwrap();
        init_logging("INFO", dir_str).unwrap();

        assert!(init_logging("debug", dir_str)
            .unwrap_err()
            .contains("refusing to switch"));
        assert!(init_logging("info", other.to_str().unwrap())
            .unwrap_err()
            .contains("refusing to switch"));

        let (level, active_dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(active_dir, dir);
    }
}
