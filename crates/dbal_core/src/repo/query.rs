//! SQL statement construction for repository operations.
//!
//! # Responsibility
//! - Build `SELECT` statements through a small chainable builder.
//! - Render `INSERT`/`UPDATE`/`DELETE` statements for equality-conjunction
//!   constraint maps.
//!
//! # Invariants
//! - Table and column names must match `^[A-Za-z_][A-Za-z0-9_]*$` and are
//!   always backtick-quoted in rendered SQL, never double-quoted: an
//!   unknown column must fail to prepare, not degrade to a string literal.
//! - Values never appear in SQL text; they are bound as positional params
//!   in the order returned alongside the SQL.

use super::repository::{RepoError, RepoResult};
use crate::model::value::{Attributes, Value};
use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Validates `name` as a table/column identifier and returns it quoted.
pub fn quote_identifier(name: &str) -> RepoResult<String> {
    if !IDENTIFIER_RE.is_match(name) {
        return Err(RepoError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("`{name}`"))
}

/// Chainable `SELECT` builder.
///
/// An empty column list selects `*`. Every `where_eq` call adds one
/// `column = ?` predicate; predicates are joined with `AND`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    columns: Vec<String>,
    table: Option<String>,
    conditions: Vec<(String, Value)>,
    limit: Option<u32>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Renders the statement text with `?N` placeholders.
    ///
    /// # Errors
    /// - `RepoError::TableNotSet` when no table was given.
    /// - `RepoError::InvalidIdentifier` for a malformed table/column name.
    pub fn to_sql(&self) -> RepoResult<String> {
        let table = self.table.as_deref().ok_or(RepoError::TableNotSet)?;

        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns
                .iter()
                .map(|column| quote_identifier(column))
                .collect::<RepoResult<Vec<_>>>()?
                .join(", ")
        };

        let mut sql = format!("SELECT {columns} FROM {}", quote_identifier(table)?);
        if !self.conditions.is_empty() {
            let pairs = self.conditions.iter().map(|(c, v)| (c.as_str(), v));
            let (clause, _) = conjunction(pairs, 1)?;
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        Ok(sql)
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> Vec<&Value> {
        self.conditions.iter().map(|(_, value)| value).collect()
    }
}

/// Renders `INSERT INTO table (...) VALUES (...)`.
///
/// Empty `data` inserts a row of column defaults.
pub(crate) fn insert_sql<'a>(
    table: &str,
    data: &'a Attributes,
) -> RepoResult<(String, Vec<&'a Value>)> {
    let table = quote_identifier(table)?;
    if data.is_empty() {
        return Ok((format!("INSERT INTO {table} DEFAULT VALUES"), Vec::new()));
    }

    let mut columns = Vec::with_capacity(data.len());
    let mut placeholders = Vec::with_capacity(data.len());
    let mut params = Vec::with_capacity(data.len());
    for (position, (column, value)) in data.iter().enumerate() {
        columns.push(quote_identifier(column)?);
        placeholders.push(format!("?{}", position + 1));
        params.push(value);
    }

    Ok((
        format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        ),
        params,
    ))
}

/// Renders `UPDATE table SET ... WHERE ...`.
pub(crate) fn update_sql<'a>(
    table: &str,
    changes: &'a Attributes,
    constraints: &'a Attributes,
) -> RepoResult<(String, Vec<&'a Value>)> {
    if changes.is_empty() {
        return Err(RepoError::EmptyChanges);
    }
    if constraints.is_empty() {
        return Err(RepoError::EmptyConstraints);
    }

    let table = quote_identifier(table)?;
    let mut assignments = Vec::with_capacity(changes.len());
    let mut params = Vec::with_capacity(changes.len() + constraints.len());
    for (position, (column, value)) in changes.iter().enumerate() {
        assignments.push(format!("{} = ?{}", quote_identifier(column)?, position + 1));
        params.push(value);
    }

    let (clause, constraint_params) = conjunction(
        constraints.iter().map(|(c, v)| (c.as_str(), v)),
        changes.len() + 1,
    )?;
    params.extend(constraint_params);

    Ok((
        format!("UPDATE {table} SET {} WHERE {clause}", assignments.join(", ")),
        params,
    ))
}

/// Renders `DELETE FROM table WHERE ...`.
pub(crate) fn delete_sql<'a>(
    table: &str,
    constraints: &'a Attributes,
) -> RepoResult<(String, Vec<&'a Value>)> {
    if constraints.is_empty() {
        return Err(RepoError::EmptyConstraints);
    }

    let table = quote_identifier(table)?;
    let (clause, params) = conjunction(constraints.iter().map(|(c, v)| (c.as_str(), v)), 1)?;
    Ok((format!("DELETE FROM {table} WHERE {clause}"), params))
}

fn conjunction<'a, I>(pairs: I, first_placeholder: usize) -> RepoResult<(String, Vec<&'a Value>)>
where
    I: Iterator<Item = (&'a str, &'a Value)>,
{
    let mut predicates = Vec::new();
    let mut params = Vec::new();
    for (offset, (column, value)) in pairs.enumerate() {
        predicates.push(format!(
            "{} = ?{}",
            quote_identifier(column)?,
            first_placeholder + offset
        ));
        params.push(value);
    }
    Ok((predicates.join(" AND "), params))
}
