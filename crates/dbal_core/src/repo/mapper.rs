//! Row-to-result mapping strategies.
//!
//! # Responsibility
//! - Decide which type a fetched row becomes.
//! - Ship the generic `Entity` mapping and a plain-record mapping.
//!
//! # Invariants
//! - `EntityMapper` copies every selected column and fills through the
//!   trusted path, so protected fields are still populated.

use crate::model::entity::{Entity, DEFAULT_IDENTIFIER_FIELD};
use crate::model::value::{Attributes, Value};
use rusqlite::{Row, Statement};
use std::marker::PhantomData;

/// Strategy used by a `Repository` to turn one row into one result item.
pub trait RowMapper {
    type Output;

    fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<Self::Output>;

    /// Column searched by `Repository::find_by_id`.
    fn identifier_column(&self) -> &str {
        DEFAULT_IDENTIFIER_FIELD
    }
}

/// Plain data types that know how to read themselves from a row.
pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Maps rows into [`Entity`] attribute bags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMapper {
    identifier_field: String,
    protected: Vec<String>,
}

impl Default for EntityMapper {
    fn default() -> Self {
        Self {
            identifier_field: DEFAULT_IDENTIFIER_FIELD.to_string(),
            protected: Vec::new(),
        }
    }
}

impl EntityMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identifier_field(mut self, field: impl Into<String>) -> Self {
        self.identifier_field = field.into();
        self
    }

    /// Fields marked protected on every produced entity.
    pub fn with_protected_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protected = names.into_iter().map(Into::into).collect();
        self
    }

    /// Builds an entity carrying this mapper's identifier and protection.
    pub fn entity(&self, attributes: Attributes) -> Entity {
        let mut entity =
            Entity::new(attributes).with_identifier_field(self.identifier_field.as_str());
        entity.set_protected_attributes(self.protected.iter().cloned());
        entity
    }
}

impl RowMapper for EntityMapper {
    type Output = Entity;

    fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<Entity> {
        let statement: &Statement<'_> = row.as_ref();
        let mut attributes = Attributes::new();
        for (index, name) in statement.column_names().into_iter().enumerate() {
            attributes.insert(name.to_string(), row.get::<_, Value>(index)?);
        }
        Ok(self.entity(attributes))
    }

    fn identifier_column(&self) -> &str {
        &self.identifier_field
    }
}

/// Maps rows into a caller-declared [`FromRow`] type.
pub struct RecordMapper<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> RecordMapper<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for RecordMapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordMapper<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for RecordMapper<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RecordMapper")
    }
}

impl<T: FromRow> RowMapper for RecordMapper<T> {
    type Output = T;

    fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<T> {
        T::from_row(row)
    }
}

/// Maps rows with an ad-hoc closure.
pub struct FnMapper<F, T> {
    map: F,
    _marker: PhantomData<fn() -> T>,
}

impl<F, T> FnMapper<F, T>
where
    F: Fn(&Row<'_>) -> rusqlite::Result<T>,
{
    pub fn new(map: F) -> Self {
        Self {
            map,
            _marker: PhantomData,
        }
    }
}

impl<F, T> RowMapper for FnMapper<F, T>
where
    F: Fn(&Row<'_>) -> rusqlite::Result<T>,
{
    type Output = T;

    fn map_row(&self, row: &Row<'_>) -> rusqlite::Result<T> {
        (self.map)(row)
    }
}
