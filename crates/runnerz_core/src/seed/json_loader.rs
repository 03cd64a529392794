//! JSON seed loader.
//!
//! # Responsibility
//! - Read a `RunCollection` document from the bundled resource, a file, or
//!   raw bytes.
//! - Gate insertion on `RunRepository::count() == 0`.
//!
//! # Invariants
//! - Without `SeedOptions::transactional`, inserts are issued one by one and
//!   a mid-batch failure leaves the earlier rows in place.
//! - With it, the whole batch commits or none of it does.

use crate::model::run::RunCollection;
use crate::repo::run_repo::{RepoError, RunRepository};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

/// Seed document compiled into the crate.
pub const BUNDLED_RUNS_JSON: &[u8] = include_bytes!("../../data/runs.json");

pub type SeedResult<T> = Result<T, SeedError>;

/// Fatal seeding failure. Callers are expected to abort startup.
#[derive(Debug)]
pub enum SeedError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Repo(RepoError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read JSON data: {err}"),
            Self::Parse(err) => write!(f, "failed to read JSON data: {err}"),
            Self::Repo(err) => write!(f, "failed to save seed runs: {err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SeedError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(value: serde_json::Error) -> Self {
        // serde_json reports reader failures as its own error kind.
        if value.is_io() {
            return Self::Io(value.into());
        }
        Self::Parse(value)
    }
}

impl From<RepoError> for SeedError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Where the seed document comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SeedSource {
    #[default]
    Bundled,
    File(PathBuf),
    Bytes(Vec<u8>),
}

impl SeedSource {
    fn read(&self) -> SeedResult<RunCollection> {
        match self {
            Self::Bundled => parse_runs(BUNDLED_RUNS_JSON),
            Self::File(path) => parse_runs(BufReader::new(File::open(path)?)),
            Self::Bytes(bytes) => parse_runs(bytes.as_slice()),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Bundled => "bundled".to_string(),
            Self::File(path) => path.display().to_string(),
            Self::Bytes(bytes) => format!("bytes({})", bytes.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOptions {
    /// Wrap all inserts in one transaction instead of committing each.
    pub transactional: bool,
}

/// What a loader run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Loaded { runs: usize },
    Skipped { existing: i64 },
}

/// Parses a `{ "runs": [...] }` document from `reader`.
pub fn parse_runs(reader: impl Read) -> SeedResult<RunCollection> {
    Ok(serde_json::from_reader(reader)?)
}

/// One-shot loader that seeds an empty store at startup.
pub struct RunJsonDataLoader<R: RunRepository> {
    repo: R,
    options: SeedOptions,
}

impl<R: RunRepository> RunJsonDataLoader<R> {
    pub fn new(repo: R) -> Self {
        Self::with_options(repo, SeedOptions::default())
    }

    pub fn with_options(repo: R, options: SeedOptions) -> Self {
        Self { repo, options }
    }

    /// Seeds the store from `source` when it holds no runs.
    ///
    /// The source is not read at all when the store already has data.
    ///
    /// # Errors
    /// - `SeedError::Io` / `SeedError::Parse` when the document cannot be read.
    /// - `SeedError::Repo` when counting or inserting fails.
    pub fn run(self, source: &SeedSource) -> SeedResult<SeedOutcome> {
        let existing = self.repo.count()?;
        if existing != 0 {
            info!(
                "event=seed_load module=seed status=skipped existing={} reason=store_not_empty",
                existing
            );
            return Ok(SeedOutcome::Skipped { existing });
        }

        let collection = source.read().map_err(|err| {
            error!(
                "event=seed_load module=seed status=error source={} error={}",
                source.describe(),
                err
            );
            err
        })?;
        let runs = collection.runs.len();
        info!(
            "event=seed_load module=seed status=start source={} runs={} transactional={}",
            source.describe(),
            runs,
            self.options.transactional
        );

        let saved = if self.options.transactional {
            self.repo.save_all_atomic(&collection.runs)
        } else {
            self.repo.save_all(&collection.runs)
        };
        if let Err(err) = saved {
            error!(
                "event=seed_load module=seed status=error runs={} error={}",
                runs, err
            );
            return Err(err.into());
        }

        info!("event=seed_load module=seed status=ok runs={}", runs);
        Ok(SeedOutcome::Loaded { runs })
    }
}
