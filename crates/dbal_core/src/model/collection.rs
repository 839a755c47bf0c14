//! Ordered, key-addressable result container.
//!
//! # Responsibility
//! - Wrap repository results (or any items) with array/map hybrid access.
//! - Provide non-mutating `filter`/`sort` and independent copies.
//!
//! # Invariants
//! - Iteration follows insertion order, not key order.
//! - `filter` keeps original keys; `sort` re-keys from `0` contiguously.
//! - `filter`, `sort` and `copy` never mutate the receiver.
//! - Integer keys handed out by `push` are never reused after removal.
//! - `index` maps every key to its position in `entries`.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CollectionResult<T> = Result<T, CollectionError>;

/// Position of an item inside a [`Collection`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Index(i64),
    Name(String),
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Index(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self::Index(i64::from(value))
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    KeyNotFound(Key),
    /// `push` after an item was stored at `i64::MAX`.
    NextIndexOccupied,
}

impl Display for CollectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyNotFound(key) => write!(f, "undefined collection key: {key}"),
            Self::NextIndexOccupied => {
                write!(f, "cannot push: the next integer key is already occupied")
            }
        }
    }
}

impl Error for CollectionError {}

/// Collection of items fetched through a `Repository`, or built by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    entries: Vec<(Key, T)>,
    index: HashMap<Key, usize>,
    /// `None` once `i64::MAX` has been used.
    next_index: Option<i64>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            next_index: Some(0),
        }
    }
}

impl<T> Collection<T> {
    /// Creates a collection keyed `0..len` in the given order.
    pub fn new(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }

    /// Creates a collection from explicit key/item pairs.
    ///
    /// A repeated key keeps its first position and its last item.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<Key>,
    {
        let mut collection = Self::default();
        for (key, item) in entries {
            collection.set(key, item);
        }
        collection
    }

    /// Borrows the backing entries in iteration order.
    pub fn items(&self) -> &[(Key, T)] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.position(&key.into()).is_some()
    }

    /// Reads the item stored at `key`.
    ///
    /// # Errors
    /// - `CollectionError::KeyNotFound` when nothing is stored at `key`.
    pub fn get(&self, key: impl Into<Key>) -> CollectionResult<&T> {
        let key = key.into();
        match self.position(&key) {
            Some(position) => Ok(&self.entries[position].1),
            None => Err(CollectionError::KeyNotFound(key)),
        }
    }

    pub fn get_mut(&mut self, key: impl Into<Key>) -> CollectionResult<&mut T> {
        let key = key.into();
        match self.position(&key) {
            Some(position) => Ok(&mut self.entries[position].1),
            None => Err(CollectionError::KeyNotFound(key)),
        }
    }

    /// Inserts or overwrites the item at `key`.
    ///
    /// Overwriting keeps the key's original position.
    pub fn set(&mut self, key: impl Into<Key>, item: T) {
        let key = key.into();
        if let (Key::Index(index), Some(next)) = (&key, self.next_index) {
            if *index >= next {
                self.next_index = index.checked_add(1);
            }
        }

        match self.position(&key) {
            Some(position) => self.entries[position].1 = item,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, item));
            }
        }
    }

    /// Appends at the next free integer key and returns that key.
    ///
    /// # Errors
    /// - `CollectionError::NextIndexOccupied` once `i64::MAX` is taken.
    pub fn push(&mut self, item: T) -> CollectionResult<Key> {
        let next = self.next_index.ok_or(CollectionError::NextIndexOccupied)?;
        let key = Key::Index(next);
        self.set(key.clone(), item);
        Ok(key)
    }

    /// Removes the item at `key`; absent keys are ignored.
    pub fn remove(&mut self, key: impl Into<Key>) -> Option<T> {
        let key = key.into();
        let position = self.index.remove(&key)?;
        let (_, item) = self.entries.remove(position);
        for (shifted, (moved, _)) in self.entries.iter().enumerate().skip(position) {
            self.index.insert(moved.clone(), shifted);
        }
        Some(item)
    }

    pub fn first(&self) -> Option<&T> {
        self.entries.first().map(|(_, item)| item)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|(_, item)| item)
    }

    pub fn into_values(self) -> Vec<T> {
        self.entries.into_iter().map(|(_, item)| item).collect()
    }

    fn position(&self, key: &Key) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn is_list(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(position, (key, _))| {
                matches!(key, Key::Index(index) if usize::try_from(*index).ok() == Some(position))
            })
    }
}

impl<T: Clone> Collection<T> {
    /// Independent copy with the same keys, items and order.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// New collection of the items matching `predicate`, keys preserved.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&T) -> bool,
    {
        Self::from_entries(
            self.entries
                .iter()
                .filter(|(_, item)| predicate(item))
                .map(|(key, item)| (key.clone(), item.clone())),
        )
    }

    /// New collection ordered by `compare` and re-keyed from `0`.
    pub fn sort<F>(&self, compare: F) -> Self
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut items: Vec<T> = self.values().cloned().collect();
        items.sort_by(compare);
        Self::new(items)
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let entries: Vec<(Key, T)> = (0_i64..)
            .zip(iter)
            .map(|(index, item)| (Key::Index(index), item))
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(position, (key, _))| (key.clone(), position))
            .collect();
        let next_index = Some(entries.len() as i64);
        Self {
            entries,
            index,
            next_index,
        }
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(value: Vec<T>) -> Self {
        Self::new(value)
    }
}

/// Borrowing iterator over `(key, item)` pairs.
pub struct Iter<'a, T> {
    inner: std::slice::Iter<'a, (Key, T)>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a Key, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, item)| (key, item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = (&'a Key, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = (Key, T);
    type IntoIter = std::vec::IntoIter<(Key, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_list() {
            let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
            for (_, item) in &self.entries {
                seq.serialize_element(item)?;
            }
            return seq.end();
        }

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, item) in &self.entries {
            map.serialize_entry(&key.to_string(), item)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::{Collection, CollectionError, Key};

    #[test]
    fn push_never_reuses_removed_index() {
        let mut collection = Collection::new(vec!["a", "b"]);
        collection.remove(1);

        assert_eq!(collection.push("c"), Ok(Key::Index(2)));
        assert_eq!(
            collection.keys().cloned().collect::<Vec<_>>(),
            [Key::Index(0), Key::Index(2)]
        );
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut collection = Collection::new(vec![1, 2, 3]);
        collection.set(0, 10);

        assert_eq!(collection.values().copied().collect::<Vec<_>>(), [10, 2, 3]);
    }

    #[test]
    fn named_keys_coexist_with_indices() {
        let mut collection = Collection::new(vec![1]);
        collection.set("total", 99);

        assert!(collection.contains_key("total"));
        assert_eq!(collection.get("total"), Ok(&99));
        assert_eq!(collection.push(2), Ok(Key::Index(1)));
    }

    #[test]
    fn remove_reindexes_later_positions() {
        let mut collection = Collection::new(vec!["a", "b", "c", "d"]);
        collection.remove(1);

        assert_eq!(collection.get(2), Ok(&"c"));
        assert_eq!(collection.get(3), Ok(&"d"));
        collection.set(3, "D");
        assert_eq!(collection.values().copied().collect::<Vec<_>>(), ["a", "c", "D"]);
    }

    #[test]
    fn large_build_and_filter_keep_keys_addressable() {
        let collection: Collection<i64> = (0..200_000).collect();
        let even = collection.filter(|item| item % 2 == 0);

        assert_eq!(even.count(), 100_000);
        assert_eq!(even.get(199_998), Ok(&199_998));
        assert!(!even.contains_key(199_999));
    }

    #[test]
    fn push_after_max_index_is_rejected() {
        let mut collection = Collection::default();
        collection.set(i64::MAX, "last");

        assert_eq!(collection.push("next"), Err(CollectionError::NextIndexOccupied));
        assert_eq!(collection.get(i64::MAX), Ok(&"last"));
        assert_eq!(collection.count(), 1);
    }
}
