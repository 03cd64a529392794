//! Persistence core for recorded runs.
//! Owns the run model, the SQLite-backed store and startup seeding.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;

pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::run::{Location, ParseLocationError, Run, RunCollection, RunId};
pub use repo::run_repo::{RepoError, RepoResult, RunRepository, SqliteRunRepository};
pub use seed::json_loader::{
    parse_runs, RunJsonDataLoader, SeedError, SeedOptions, SeedOutcome, SeedResult, SeedSource,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
