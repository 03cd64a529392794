//! File logging for the runnerz host process.
//!
//! The core only emits `log` records; the host decides whether they go
//! anywhere by calling `init_logging` once at startup.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, LogSpecification, Logger,
    LoggerHandle, Naming,
};
use log::info;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "runnerz";
const ROTATE_AT_BYTES: u64 = 4 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 3;

/// Handle of the running logger; dropping it would stop file output.
static ACTIVE: OnceCell<(PathBuf, LoggerHandle)> = OnceCell::new();

#[derive(Debug)]
pub enum LoggingError {
    /// `spec` is not a valid `flexi_logger` spec such as `info` or
    /// `runnerz_core=debug`.
    InvalidSpec(FlexiLoggerError),
    CreateDir { dir: PathBuf, source: std::io::Error },
    Start(FlexiLoggerError),
    /// Logging already writes to a different directory.
    AlreadyActive { dir: PathBuf },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSpec(err) => write!(f, "invalid log spec: {err}"),
            Self::CreateDir { dir, source } => {
                write!(f, "cannot create log directory `{}`: {source}", dir.display())
            }
            Self::Start(err) => write!(f, "cannot start logger: {err}"),
            Self::AlreadyActive { dir } => {
                write!(f, "logging already writes to `{}`", dir.display())
            }
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSpec(err) | Self::Start(err) => Some(err),
            Self::CreateDir { source, .. } => Some(source),
            Self::AlreadyActive { .. } => None,
        }
    }
}

/// Starts rotating file logging under `log_dir`, with warnings and errors
/// mirrored to stderr.
///
/// Calling it again with the same directory is a no-op.
pub fn init_logging(spec: &str, log_dir: &Path) -> Result<(), LoggingError> {
    let spec = LogSpecification::parse(spec).map_err(LoggingError::InvalidSpec)?;

    let (dir, _) = ACTIVE.get_or_try_init(|| -> Result<_, LoggingError> {
        std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
            dir: log_dir.to_path_buf(),
            source,
        })?;
        let handle = Logger::with(spec)
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
                    .basename(LOG_FILE_BASENAME),
            )
            .duplicate_to_stderr(Duplicate::Warn)
            .rotate(
                Criterion::Size(ROTATE_AT_BYTES),
                Naming::Timestamps,
                Cleanup::KeepLogFiles(KEEP_LOG_FILES),
            )
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(LoggingError::Start)?;
        info!(
            "event=logging_init module=logging status=ok log_dir={} version={}",
            log_dir.display(),
            env!("CARGO_PKG_VERSION")
        );
        Ok((log_dir.to_path_buf(), handle))
    })?;

    if dir != log_dir {
        return Err(LoggingError::AlreadyActive { dir: dir.clone() });
    }
    Ok(())
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}
