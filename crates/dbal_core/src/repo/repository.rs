//! Table-bound CRUD repository over a borrowed SQLite connection.
//!
//! # Responsibility
//! - Provide insert/update/delete over equality-conjunction constraints.
//! - Run finder queries and map rows through a pluggable `RowMapper`.
//!
//! # Invariants
//! - One statement per call, executed synchronously on the caller's
//!   connection. No retries, no transactions.
//! - Driver failures are returned unchanged inside `RepoError::Db` and are
//!   not logged here.

use super::mapper::{EntityMapper, RowMapper};
use super::query::{delete_sql, insert_sql, update_sql, SelectQuery};
use crate::db::DbError;
use crate::model::collection::Collection;
use crate::model::entity::Entity;
use crate::model::value::{Attributes, Value};
use log::debug;
use rusqlite::{params_from_iter, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for statement building and execution.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Operation needs a table but `set_table` was never called.
    TableNotSet,
    /// Update/delete without any constraint would touch every row.
    EmptyConstraints,
    /// Update with nothing to change.
    EmptyChanges,
    InvalidIdentifier(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::TableNotSet => write!(f, "repository table is not set"),
            Self::EmptyConstraints => write!(f, "constraints must not be empty"),
            Self::EmptyChanges => write!(f, "update changes must not be empty"),
            Self::InvalidIdentifier(name) => write!(f, "invalid SQL identifier `{name}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::TableNotSet => None,
            Self::EmptyConstraints => None,
            Self::EmptyChanges => None,
            Self::InvalidIdentifier(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Base repository for one table.
///
/// `M` decides what a fetched row becomes; the default yields [`Entity`].
pub struct Repository<'conn, M = EntityMapper> {
    conn: &'conn Connection,
    table: Option<String>,
    mapper: M,
}

impl<'conn> Repository<'conn, EntityMapper> {
    /// Creates an entity-mapping repository with no table set.
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_mapper(conn, EntityMapper::default())
    }

    /// Creates an unsaved entity shaped like the ones this repository
    /// returns.
    pub fn new_entity(&self, attributes: Attributes) -> Entity {
        self.mapper.entity(attributes)
    }
}

impl<'conn, M: RowMapper> Repository<'conn, M> {
    pub fn with_mapper(conn: &'conn Connection, mapper: M) -> Self {
        Self {
            conn,
            table: None,
            mapper,
        }
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn set_table(&mut self, table: impl Into<String>) {
        self.table = Some(table.into());
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// Starts an empty `SELECT` builder for custom finders.
    pub fn new_query(&self) -> SelectQuery {
        SelectQuery::new()
    }

    pub fn new_collection<T>(&self, items: Vec<T>) -> Collection<T> {
        Collection::new(items)
    }

    /// Runs `query` and maps its first row, if any.
    pub fn fetch(&self, query: &SelectQuery) -> RepoResult<Option<M::Output>> {
        let started_at = Instant::now();
        let sql = query.to_sql()?;
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(query.params()))?;

        let item = match rows.next()? {
            Some(row) => Some(self.mapper.map_row(row)?),
            None => None,
        };

        debug!(
            "event=repo_fetch module=repo status=ok table={} found={} duration_ms={}",
            query.table().unwrap_or_default(),
            item.is_some(),
            started_at.elapsed().as_millis()
        );
        Ok(item)
    }

    /// Runs `query` and maps every row into a collection keyed `0..n`.
    pub fn fetch_all(&self, query: &SelectQuery) -> RepoResult<Collection<M::Output>> {
        let started_at = Instant::now();
        let sql = query.to_sql()?;
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(query.params()))?;

        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(self.mapper.map_row(row)?);
        }

        debug!(
            "event=repo_fetch_all module=repo status=ok table={} rows={} duration_ms={}",
            query.table().unwrap_or_default(),
            items.len(),
            started_at.elapsed().as_millis()
        );
        Ok(self.new_collection(items))
    }

    /// Inserts one row and returns the generated row id.
    pub fn insert(&self, data: &Attributes) -> RepoResult<i64> {
        let started_at = Instant::now();
        let table = self.require_table()?;
        let (sql, params) = insert_sql(table, data)?;
        self.conn.execute(&sql, params_from_iter(params))?;
        let id = self.conn.last_insert_rowid();

        debug!(
            "event=repo_insert module=repo status=ok table={} row_id={} duration_ms={}",
            table,
            id,
            started_at.elapsed().as_millis()
        );
        Ok(id)
    }

    /// Deletes every row matching all `constraints`.
    pub fn delete(&self, constraints: &Attributes) -> RepoResult<()> {
        let started_at = Instant::now();
        let table = self.require_table()?;
        let (sql, params) = delete_sql(table, constraints)?;
        let deleted = self.conn.execute(&sql, params_from_iter(params))?;

        debug!(
            "event=repo_delete module=repo status=ok table={} rows={} duration_ms={}",
            table,
            deleted,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Applies `changes` to every row matching all `constraints` and
    /// returns the number of affected rows.
    pub fn update(&self, changes: &Attributes, constraints: &Attributes) -> RepoResult<usize> {
        let started_at = Instant::now();
        let table = self.require_table()?;
        let (sql, params) = update_sql(table, changes, constraints)?;
        let updated = self.conn.execute(&sql, params_from_iter(params))?;

        debug!(
            "event=repo_update module=repo status=ok table={} rows={} duration_ms={}",
            table,
            updated,
            started_at.elapsed().as_millis()
        );
        Ok(updated)
    }

    /// `SELECT * FROM table WHERE column = search LIMIT 1`.
    pub fn find_by(
        &self,
        search: impl Into<Value>,
        column: &str,
    ) -> RepoResult<Option<M::Output>> {
        let query = self.table_query()?.where_eq(column, search).limit(1);
        self.fetch(&query)
    }

    /// `find_by` against the mapper's identifier column.
    pub fn find_by_id(&self, id: impl Into<Value>) -> RepoResult<Option<M::Output>> {
        self.find_by(id, self.mapper.identifier_column())
    }

    /// `SELECT * FROM table WHERE column = search`.
    pub fn find_all_by(
        &self,
        search: impl Into<Value>,
        column: &str,
    ) -> RepoResult<Collection<M::Output>> {
        let query = self.table_query()?.where_eq(column, search);
        self.fetch_all(&query)
    }

    pub fn find_all(&self) -> RepoResult<Collection<M::Output>> {
        let query = self.table_query()?;
        self.fetch_all(&query)
    }

    fn require_table(&self) -> RepoResult<&str> {
        self.table.as_deref().ok_or(RepoError::TableNotSet)
    }

    fn table_query(&self) -> RepoResult<SelectQuery> {
        Ok(self.new_query().from_table(self.require_table()?))
    }
}
