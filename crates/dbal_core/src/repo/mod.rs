//! Repository layer over a borrowed SQLite connection.
//!
//! # Responsibility
//! - Build and run CRUD statements against a single table.
//! - Turn rows into entities, plain records or collections of either.
//!
//! # Invariants
//! - Identifiers are validated and quoted; values are always bound.
//! - Repository APIs never swallow driver errors.

pub mod mapper;
pub mod query;
pub mod repository;
