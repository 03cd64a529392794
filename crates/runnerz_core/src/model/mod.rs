//! Domain model for recorded exercise sessions.
//!
//! # Responsibility
//! - Define the canonical `Run` value shared by storage and seeding.
//! - Keep the seed document shape next to the record it carries.
//!
//! # Invariants
//! - Every run is identified by a caller-assigned `RunId`.
//! - `Location` is a closed set; its text form is the storage form.

pub mod run;
