//! Startup host for the run store.
//!
//! # Responsibility
//! - Open the database and create the `run` table if needed.
//! - Run the seed loader once before anything reads the store.
//! - Print a short summary (and optionally every run) to stdout.

use clap::Parser;
use log::error;
use runnerz_core::db::{open_db, open_db_in_memory};
use runnerz_core::{
    core_version, default_log_level, init_logging, RunJsonDataLoader, RunRepository, SeedOptions,
    SeedOutcome, SeedSource, SqliteRunRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Seed and inspect a run database.
#[derive(Parser, Debug)]
#[command(name = "runnerz", version, about = "Seed and inspect a run database")]
struct Cli {
    /// SQLite database file. Uses an in-memory database when omitted.
    #[arg(long)]
    db: Option<PathBuf>,
    /// Seed document to load instead of the bundled one.
    #[arg(long)]
    seed: Option<PathBuf>,
    /// Insert the seed document in a single transaction.
    #[arg(long)]
    transactional_seed: bool,
    /// Log spec, e.g. `info` or `runnerz_core=debug`.
    #[arg(long, default_value_t = default_log_level().to_string())]
    log_level: String,
    /// Directory for rolling log files. Logging is off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Print every stored run after startup.
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(&cli.log_level, log_dir) {
            eprintln!("runnerz: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=startup module=cli status=error error={err}");
            eprintln!("runnerz: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let conn = match cli.db.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let repo = SqliteRunRepository::try_new(&conn)?;

    let source = cli
        .seed
        .clone()
        .map_or(SeedSource::Bundled, SeedSource::File);
    let options = SeedOptions {
        transactional: cli.transactional_seed,
    };
    match RunJsonDataLoader::with_options(&repo, options).run(&source)? {
        SeedOutcome::Loaded { runs } => println!("seeded {runs} runs"),
        SeedOutcome::Skipped { existing } => {
            println!("store already holds {existing} runs; seed skipped")
        }
    }

    println!("runnerz_core version={}", core_version());
    println!("runs={}", repo.count()?);

    if cli.list {
        for run in repo.find_all()? {
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                run.id, run.title, run.started_on, run.completed_on, run.miles, run.location
            );
        }
    }

    Ok(())
}
