//! Startup seeding of an empty run store.
//!
//! # Responsibility
//! - Parse the bundled (or caller-supplied) JSON run document.
//! - Insert it through `RunRepository` only when the store is empty.
//!
//! # Invariants
//! - A loader runs at most once; `RunJsonDataLoader::run` consumes it.
//! - Read/parse failures are fatal and returned, never swallowed.

pub mod json_loader;
