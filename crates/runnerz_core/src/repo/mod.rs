//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the run store capability interface.
//! - Isolate SQLite query details from seeding and callers.
//!
//! # Invariants
//! - Mutations succeed only when exactly one row is affected.
//! - Absence on lookup is `Ok(None)`, never an error.

pub mod run_repo;
