//! Entity domain model.
//!
//! # Responsibility
//! - Hold one record as a flat field-name to value bag.
//! - Guard protected fields against the normal mutation path.
//!
//! # Invariants
//! - `set_attribute` never writes a key listed in the protected set.
//! - `force_fill` and construction bypass protection (trusted rows only).
//! - A missing key reads as `None`; a stored `Value::Null` reads as
//!   `Some(&Value::Null)`.

use super::value::{Attributes, Value};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Attribute name used as identifier unless configured otherwise.
pub const DEFAULT_IDENTIFIER_FIELD: &str = "id";

pub type EntityResult<T> = Result<T, EntityError>;

/// Attribute mutation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// Write through the normal setter to a protected field.
    ProtectedAttribute { key: String },
}

impl Display for EntityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProtectedAttribute { key } => write!(f, "`{key}` is a protected attribute"),
        }
    }
}

impl Error for EntityError {}

/// Representation of a single row within a result set.
///
/// This is the default result type produced by a `Repository`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    attributes: Attributes,
    protected: BTreeSet<String>,
    identifier: String,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(Attributes::new())
    }
}

impl Entity {
    /// Creates an entity populated from trusted data, skipping protection.
    pub fn new(attributes: Attributes) -> Self {
        let mut entity = Self {
            attributes: Attributes::new(),
            protected: BTreeSet::new(),
            identifier: DEFAULT_IDENTIFIER_FIELD.to_string(),
        };
        entity.force_fill(attributes);
        entity
    }

    /// Changes which attribute is reported by [`Entity::identifier`].
    pub fn with_identifier_field(mut self, field: impl Into<String>) -> Self {
        self.identifier = field.into();
        self
    }

    pub fn identifier_field(&self) -> &str {
        &self.identifier
    }

    /// Sets every pair through [`Entity::set_attribute`].
    ///
    /// # Errors
    /// - Stops at the first protected key. Pairs applied before it stay
    ///   applied.
    pub fn fill(&mut self, attributes: Attributes) -> EntityResult<()> {
        for (key, value) in attributes {
            self.set_attribute(key, value)?;
        }
        Ok(())
    }

    /// Replaces the whole attribute set without checking protection.
    pub fn force_fill(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Inserts or overwrites one attribute.
    ///
    /// # Errors
    /// - `EntityError::ProtectedAttribute` when `key` is protected; the
    ///   attribute set is left untouched.
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> EntityResult<()> {
        let key = key.into();
        if self.protected.contains(&key) {
            return Err(EntityError::ProtectedAttribute { key });
        }

        self.attributes.insert(key, value.into());
        Ok(())
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the identifying value, if the identifier field is present.
    pub fn identifier(&self) -> Option<&Value> {
        self.attribute(&self.identifier)
    }

    /// Replaces the protected field set wholesale.
    pub fn set_protected_attributes<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protected = names.into_iter().map(Into::into).collect();
    }

    pub fn protected_attributes(&self) -> &BTreeSet<String> {
        &self.protected
    }

    /// Flat copy of the attributes for external encoding.
    pub fn to_attributes(&self) -> Attributes {
        self.attributes.clone()
    }

    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }
}

impl From<Attributes> for Entity {
    fn from(value: Attributes) -> Self {
        Self::new(value)
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::{Entity, EntityError};
    use crate::model::value::{attributes, Value};

    #[test]
    fn fill_is_partially_applied_before_protected_key() {
        let mut entity = Entity::default();
        entity.set_protected_attributes(["b"]);

        let err = entity
            .fill(attributes([("a", 1), ("b", 2), ("c", 3)]))
            .unwrap_err();

        assert_eq!(
            err,
            EntityError::ProtectedAttribute {
                key: "b".to_string()
            }
        );
        assert_eq!(entity.attribute("a"), Some(&Value::Integer(1)));
        assert_eq!(entity.attribute("b"), None);
        assert_eq!(entity.attribute("c"), None);
    }

    #[test]
    fn protected_error_names_the_key() {
        let err = EntityError::ProtectedAttribute {
            key: "id".to_string(),
        };
        assert_eq!(err.to_string(), "`id` is a protected attribute");
    }

    #[test]
    fn construction_bypasses_protection() {
        let mut entity = Entity::new(attributes([("id", 7)]));
        entity.set_protected_attributes(["id"]);
        entity.force_fill(attributes([("id", 8)]));

        assert_eq!(entity.identifier(), Some(&Value::Integer(8)));
    }
}
