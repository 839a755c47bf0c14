//! In-memory data model for fetched records.
//!
//! # Responsibility
//! - Define the dynamic `Value` carried by every column.
//! - Define `Entity` (one record) and `Collection` (many results).
//!
//! # Invariants
//! - Model types hold no database handle; they are plain values.

pub mod collection;
pub mod entity;
pub mod value;
