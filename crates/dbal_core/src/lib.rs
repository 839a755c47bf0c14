//! Minimal data-access layer over SQLite.
//! Table-bound repositories return `Entity` attribute bags (or plain
//! records) wrapped in key-preserving `Collection`s.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{open_db, open_db_in_memory, open_db_with, DbError, DbOptions, DbResult};
pub use logging::{
    default_log_level, init_logging, init_logging_with, logging_status, LoggingConfig,
    LoggingError,
};
pub use model::collection::{Collection, CollectionError, CollectionResult, Key};
pub use model::entity::{Entity, EntityError, EntityResult, DEFAULT_IDENTIFIER_FIELD};
pub use model::value::{attributes, Attributes, Value};
pub use repo::mapper::{EntityMapper, FnMapper, FromRow, RecordMapper, RowMapper};
pub use repo::query::{quote_identifier, SelectQuery};
pub use repo::repository::{RepoError, RepoResult, Repository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
