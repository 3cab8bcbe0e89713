//! # Collections
//!
//! A `Collection` is an ordered key→value map with a large functional
//! operation set. Every operation leaves the receiver untouched and returns
//! a new collection (or a borrowed view into the receiver).
//!
//! ## Keys and offsets
//!
//! Entries are addressed two ways at once:
//!
//! - by **key** (`get`, `set`, `retrieve`, ...), and
//! - by **offset**, the zero-based position in insertion order regardless
//!   of key type (`get_offset`, `has_offset`, ...). Negative offsets count
//!   from the end, so `get_offset(-1)` is the last element.
//!
//! ```rust
//! use shaped_core::{array, Collection, Value};
//!
//! let coll = Collection::try_from(array!["foo" => "bar", "baz" => "bin"]).unwrap();
//! let other = Collection::try_from(array!["baz" => "bone", "boo" => "hoo"]).unwrap();
//! let merged = coll.merge(&other);
//!
//! assert_eq!(merged.to_array(), array!["foo" => "bar", "baz" => "bone", "boo" => "hoo"]);
//! assert_eq!(coll.get("baz"), Some(&Value::from("bin"))); // receiver unchanged
//! assert_eq!(merged.get_offset(-1).unwrap(), &Value::from("hoo"));
//! ```

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::cursor::Cursor;
use crate::error::CollectionError;
use crate::key::Key;
use crate::natural;
use crate::value::Value;

const TARGET: &str = "Collection";

/// An ordered key→value collection.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    data: IndexMap<Key, Value>,
}

/// Restricts the keys at which a `contains` match counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum KeyFilter {
    /// A match at any key counts.
    #[default]
    Any,
    /// Only a match at this key counts.
    Key(Key),
    /// A match at any of these keys counts.
    OneOf(Vec<Key>),
}

impl KeyFilter {
    pub fn key(key: impl Into<Key>) -> Self {
        KeyFilter::Key(key.into())
    }

    pub fn one_of<K: Into<Key>>(keys: impl IntoIterator<Item = K>) -> Self {
        KeyFilter::OneOf(keys.into_iter().map(Into::into).collect())
    }

    /// Whether a match at `key` counts.
    pub fn admits(&self, key: &Key) -> bool {
        match self {
            KeyFilter::Any => true,
            KeyFilter::Key(k) => k == key,
            KeyFilter::OneOf(keys) => keys.contains(key),
        }
    }
}

impl From<Key> for KeyFilter {
    fn from(key: Key) -> Self {
        KeyFilter::Key(key)
    }
}

impl From<&str> for KeyFilter {
    fn from(key: &str) -> Self {
        KeyFilter::Key(Key::from(key))
    }
}

impl From<i64> for KeyFilter {
    fn from(key: i64) -> Self {
        KeyFilter::Key(Key::Int(key))
    }
}

impl From<i32> for KeyFilter {
    fn from(key: i32) -> Self {
        KeyFilter::Key(Key::from(key))
    }
}

impl<K: Into<Key>> From<Vec<K>> for KeyFilter {
    fn from(keys: Vec<K>) -> Self {
        KeyFilter::one_of(keys)
    }
}

impl<K: Into<Key>, const N: usize> From<[K; N]> for KeyFilter {
    fn from(keys: [K; N]) -> Self {
        KeyFilter::one_of(keys)
    }
}

/// What a `contains` search looks for.
#[derive(Clone, Copy)]
pub enum Needle<'a> {
    /// A value, compared with [`Value::loose_eq`].
    Value(&'a Value),
    /// A predicate over `(value, key)`.
    Matching(&'a dyn Fn(&Value, &Key) -> bool),
}

impl Needle<'_> {
    pub fn matches(&self, value: &Value, key: &Key) -> bool {
        match self {
            Needle::Value(needle) => needle.loose_eq(value),
            Needle::Matching(pred) => pred(value, key),
        }
    }
}

impl fmt::Debug for Needle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Needle::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Needle::Matching(_) => f.write_str("Matching(..)"),
        }
    }
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list-shaped collection keyed `0, 1, 2, ...`.
    pub fn from_values<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Key::from(i), v.into()))
            .collect()
    }

    pub fn from_map(data: IndexMap<Key, Value>) -> Self {
        Self { data }
    }

    /// The backing ordered map.
    pub fn as_map(&self) -> &IndexMap<Key, Value> {
        &self.data
    }

    pub fn into_map(self) -> IndexMap<Key, Value> {
        self.data
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// Number of entries satisfying `pred`.
    pub fn count_where(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> usize {
        self.data.iter().filter(|(k, v)| pred(v, k)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True when keys are exactly `0..count()` in order.
    pub fn is_list(&self) -> bool {
        self.data
            .keys()
            .enumerate()
            .all(|(i, k)| k.as_int() == Some(i as i64))
    }

    // ========================================================================
    // Key access
    // ========================================================================

    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.data.contains_key(&key.into())
    }

    /// Value at `key`, or `None`. Never fails.
    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.data.get(&key.into())
    }

    /// Value at `key`, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: impl Into<Key>, default: &'a Value) -> &'a Value {
        self.get(key).unwrap_or(default)
    }

    /// Value at `key`.
    ///
    /// # Errors
    ///
    /// `KeyNotFound` if the key is absent.
    pub fn retrieve(&self, key: impl Into<Key>) -> Result<&Value, CollectionError> {
        let key = key.into();
        match self.data.get(&key) {
            Some(v) => Ok(v),
            None => Err(CollectionError::KeyNotFound { key }),
        }
    }

    /// A copy with `key` set to `value`. An existing key keeps its position.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) -> Collection {
        let mut data = self.data.clone();
        data.insert(key.into(), value.into());
        Collection { data }
    }

    /// A copy with `key` set only if it was absent.
    pub fn add(&self, key: impl Into<Key>, value: impl Into<Value>) -> Collection {
        let key = key.into();
        if self.data.contains_key(&key) {
            return self.clone();
        }
        self.set(key, value)
    }

    /// A copy without `key`. Absent keys are ignored.
    pub fn delete(&self, key: impl Into<Key>) -> Collection {
        let mut data = self.data.clone();
        data.shift_remove(&key.into());
        Collection { data }
    }

    /// Remove `key`, returning its value (if any) and the remainder.
    pub fn take(&self, key: impl Into<Key>) -> (Option<Value>, Collection) {
        let mut data = self.data.clone();
        let value = data.shift_remove(&key.into());
        (value, Collection { data })
    }

    /// The integer key `append` would use: one past the largest integer key,
    /// or 0. `None` once `i64::MAX` is taken.
    pub fn next_index(&self) -> Option<i64> {
        match self.data.keys().filter_map(Key::as_int).max() {
            Some(max) => max.checked_add(1),
            None => Some(0),
        }
    }

    /// A copy with `value` under [`Collection::next_index`].
    ///
    /// # Errors
    ///
    /// `InputValidation` if the next integer key is already occupied.
    pub fn append(&self, value: impl Into<Value>) -> Result<Collection, CollectionError> {
        let next = self.next_index().ok_or_else(next_index_occupied)?;
        Ok(self.set(next, value))
    }

    /// A copy with `value` first. Integer keys are renumbered from 0; string
    /// keys are kept.
    pub fn prepend(&self, value: impl Into<Value>) -> Collection {
        let entries = std::iter::once((Key::Int(0), value.into()))
            .chain(self.data.iter().map(|(k, v)| (k.clone(), v.clone())));
        renumber(entries)
    }

    /// Remove the last element, returning it and the remainder.
    pub fn pop(&self) -> (Option<Value>, Collection) {
        let mut data = self.data.clone();
        let last = data.pop().map(|(_, v)| v);
        (last, Collection { data })
    }

    /// Remove the first element, returning it and the (renumbered) remainder.
    pub fn shift(&self) -> (Option<Value>, Collection) {
        let mut entries = self.data.iter().map(|(k, v)| (k.clone(), v.clone()));
        let first = entries.next().map(|(_, v)| v);
        (first, renumber(entries))
    }

    /// The keys, as values of a new list.
    pub fn keys(&self) -> Collection {
        Collection::from_values(self.data.keys().map(Value::from))
    }

    /// The values, re-indexed from 0.
    pub fn values(&self) -> Collection {
        Collection::from_values(self.data.values().cloned())
    }

    // ========================================================================
    // Combination
    // ========================================================================

    /// Combine with `other`; incoming values overwrite on key collision.
    pub fn merge(&self, other: &Collection) -> Collection {
        let mut data = self.data.clone();
        for (k, v) in &other.data {
            data.insert(k.clone(), v.clone());
        }
        Collection { data }
    }

    /// Combine with `other`; the receiver's values win on key collision.
    pub fn union(&self, other: &Collection) -> Collection {
        let mut data = self.data.clone();
        for (k, v) in &other.data {
            data.entry(k.clone()).or_insert_with(|| v.clone());
        }
        Collection { data }
    }

    /// Pair the receiver's keys with `values`' values, by position.
    ///
    /// # Errors
    ///
    /// `InputValidation` if the two collections differ in size.
    pub fn combine(&self, values: &Collection) -> Result<Collection, CollectionError> {
        if self.count() != values.count() {
            return Err(CollectionError::invalid_input(
                TARGET,
                format!(
                    "cannot combine {} keys with {} values",
                    self.count(),
                    values.count()
                ),
            ));
        }
        Ok(self
            .data
            .keys()
            .zip(values.data.values())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    /// Positional tuples `[self_i, other1_i, ...]`, one per element of the
    /// receiver. Positions missing from a shorter `other` read as `Null`.
    pub fn zip(&self, others: &[&Collection]) -> Collection {
        Collection::from_values(self.data.values().enumerate().map(|(i, v)| {
            let mut tuple = vec![v.clone()];
            tuple.extend(others.iter().map(|other| {
                other
                    .data
                    .get_index(i)
                    .map(|(_, w)| w.clone())
                    .unwrap_or_default()
            }));
            Value::Array(Collection::from_values(tuple))
        }))
    }

    /// Entries whose value appears nowhere in `other`.
    pub fn diff(&self, other: &Collection) -> Collection {
        self.retain(|_, v| !other.data.values().any(|w| w.loose_eq(v)))
    }

    /// Entries whose key is absent from `other`.
    pub fn diff_keys(&self, other: &Collection) -> Collection {
        self.retain(|k, _| !other.data.contains_key(k))
    }

    /// Entries whose value also appears in `other`.
    pub fn intersect(&self, other: &Collection) -> Collection {
        self.retain(|_, v| other.data.values().any(|w| w.loose_eq(v)))
    }

    /// Entries whose key also appears in `other`.
    pub fn intersect_keys(&self, other: &Collection) -> Collection {
        self.retain(|k, _| other.data.contains_key(k))
    }

    /// Everything except the given keys.
    pub fn except<K: Into<Key>>(&self, keys: impl IntoIterator<Item = K>) -> Collection {
        let keys: Vec<Key> = keys.into_iter().map(Into::into).collect();
        self.retain(|k, _| !keys.contains(k))
    }

    /// Only the given keys, in the receiver's order.
    pub fn only<K: Into<Key>>(&self, keys: impl IntoIterator<Item = K>) -> Collection {
        let keys: Vec<Key> = keys.into_iter().map(Into::into).collect();
        self.retain(|k, _| keys.contains(k))
    }

    /// Swap keys and values. Later duplicates win.
    ///
    /// # Errors
    ///
    /// `InputValidation` if a value has no text form (arrays, objects).
    pub fn flip(&self) -> Result<Collection, CollectionError> {
        let mut data = IndexMap::with_capacity(self.data.len());
        for (k, v) in &self.data {
            let Some(text) = v.to_text() else {
                debug!(value_type = v.type_name(), "cannot flip value into a key");
                return Err(CollectionError::invalid_input(
                    TARGET,
                    format!("can only flip scalar values, got {}", v.type_name()),
                ));
            };
            data.insert(Key::from(text), Value::from(k));
        }
        Ok(Collection { data })
    }

    fn retain(&self, mut keep: impl FnMut(&Key, &Value) -> bool) -> Collection {
        self.data
            .iter()
            .filter(|(k, v)| keep(k, v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Whether a value loosely equal to `value` sits at a key admitted by
    /// `at`.
    ///
    /// ```rust
    /// use shaped_core::{array, Collection, KeyFilter};
    ///
    /// let coll = Collection::try_from(array!["foo" => "bar", "boo" => "far"]).unwrap();
    /// assert!(coll.contains("bar", KeyFilter::Any));
    /// assert!(coll.contains("bar", "foo"));
    /// assert!(!coll.contains("bar", ["boo", "goo"]));
    /// ```
    pub fn contains(&self, value: impl Into<Value>, at: impl Into<KeyFilter>) -> bool {
        let value = value.into();
        self.contains_needle(&Needle::Value(&value), &at.into())
    }

    /// Whether an entry satisfying `pred` sits at a key admitted by `at`.
    pub fn contains_where(
        &self,
        pred: impl Fn(&Value, &Key) -> bool,
        at: impl Into<KeyFilter>,
    ) -> bool {
        self.contains_needle(&Needle::Matching(&pred), &at.into())
    }

    /// Flat search shared by `contains` and `contains_where`. Matches at
    /// keys the filter does not admit are skipped and the scan continues.
    pub fn contains_needle(&self, needle: &Needle<'_>, at: &KeyFilter) -> bool {
        self.data
            .iter()
            .any(|(k, v)| needle.matches(v, k) && at.admits(k))
    }

    /// Key of the first value loosely equal to `value`.
    pub fn find_index(&self, value: impl Into<Value>) -> Option<&Key> {
        let value = value.into();
        self.data
            .iter()
            .find(|(_, v)| value.loose_eq(v))
            .map(|(k, _)| k)
    }

    /// Key of the first value loosely equal to `value`.
    ///
    /// # Errors
    ///
    /// `ValueNotFound` if nothing matches.
    pub fn index_of(&self, value: impl Into<Value>) -> Result<&Key, CollectionError> {
        let value = value.into();
        match self.data.iter().find(|(_, v)| value.loose_eq(v)) {
            Some((k, _)) => Ok(k),
            None => Err(CollectionError::ValueNotFound {
                value: value.to_string(),
            }),
        }
    }

    /// Every key whose value loosely equals `value`, as a list.
    pub fn indices_of(&self, value: impl Into<Value>) -> Collection {
        let value = value.into();
        Collection::from_values(
            self.data
                .iter()
                .filter(|(_, v)| value.loose_eq(v))
                .map(|(k, _)| Value::from(k)),
        )
    }

    // ========================================================================
    // Functional operations
    // ========================================================================

    /// Transform every value; keys are kept. The callback receives
    /// `(value, key, ordinal)`.
    pub fn map(&self, mut f: impl FnMut(&Value, &Key, usize) -> Value) -> Collection {
        self.data
            .iter()
            .enumerate()
            .map(|(i, (k, v))| (k.clone(), f(v, k, i)))
            .collect()
    }

    /// Keep entries for which `pred(value, key, ordinal)` holds.
    pub fn filter(&self, mut pred: impl FnMut(&Value, &Key, usize) -> bool) -> Collection {
        self.data
            .iter()
            .enumerate()
            .filter(|(i, (k, v))| pred(v, k, *i))
            .map(|(_, (k, v))| (k.clone(), v.clone()))
            .collect()
    }

    /// Drop entries for which `pred(value, key, ordinal)` holds.
    pub fn exclude(&self, mut pred: impl FnMut(&Value, &Key, usize) -> bool) -> Collection {
        self.filter(|v, k, i| !pred(v, k, i))
    }

    /// Visit entries in order until `f` returns `false`.
    pub fn each(&self, mut f: impl FnMut(&Value, &Key) -> bool) -> &Self {
        for (k, v) in &self.data {
            if !f(v, k) {
                break;
            }
        }
        self
    }

    /// Visit every entry.
    pub fn walk(&self, mut f: impl FnMut(&Value, &Key)) -> &Self {
        for (k, v) in &self.data {
            f(v, k);
        }
        self
    }

    pub fn first(&self) -> Option<&Value> {
        self.data.first().map(|(_, v)| v)
    }

    pub fn first_where(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> Option<&Value> {
        self.data.iter().find(|(k, v)| pred(v, k)).map(|(_, v)| v)
    }

    pub fn last(&self) -> Option<&Value> {
        self.data.last().map(|(_, v)| v)
    }

    /// Last entry satisfying `pred`: the first match scanning in reverse.
    pub fn last_where(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> Option<&Value> {
        self.data
            .iter()
            .rev()
            .find(|(k, v)| pred(v, k))
            .map(|(_, v)| v)
    }

    /// Left-to-right accumulation. The callback receives
    /// `(value, carry, key, ordinal)`.
    ///
    /// The name is historical; see [`Collection::fold_left`] for the mirror.
    pub fn fold_right<T>(&self, initial: T, mut f: impl FnMut(&Value, T, &Key, usize) -> T) -> T {
        self.data
            .iter()
            .enumerate()
            .fold(initial, |carry, (i, (k, v))| f(v, carry, k, i))
    }

    /// Accumulation over the reversed sequence; ordinals count from the end.
    pub fn fold_left<T>(&self, initial: T, mut f: impl FnMut(&Value, T, &Key, usize) -> T) -> T {
        self.data
            .iter()
            .rev()
            .enumerate()
            .fold(initial, |carry, (i, (k, v))| f(v, carry, k, i))
    }

    /// Whether every value is truthy.
    pub fn all(&self) -> bool {
        self.data.values().all(Value::is_truthy)
    }

    pub fn all_where(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> bool {
        self.data.iter().all(|(k, v)| pred(v, k))
    }

    /// Whether no value is truthy.
    pub fn none(&self) -> bool {
        !self.data.values().any(Value::is_truthy)
    }

    pub fn none_where(&self, mut pred: impl FnMut(&Value, &Key) -> bool) -> bool {
        !self.data.iter().any(|(k, v)| pred(v, k))
    }

    /// Hand the whole collection to `f`.
    pub fn pipe<T>(&self, f: impl FnOnce(&Self) -> T) -> T {
        f(self)
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Reverse order; keys are kept.
    pub fn reverse(&self) -> Collection {
        self.data
            .iter()
            .rev()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Drop values loosely equal to an earlier value.
    pub fn unique(&self) -> Collection {
        let mut kept: Vec<(&Key, &Value)> = Vec::new();
        for (k, v) in &self.data {
            if !kept.iter().any(|(_, seen)| seen.loose_eq(v)) {
                kept.push((k, v));
            }
        }
        kept.into_iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Natural, case-insensitive sort on values; keys are kept.
    pub fn sort(&self) -> Collection {
        self.sort_by(|a, b| natural::compare(&sort_text(a), &sort_text(b)))
    }

    /// Stable sort on values with a custom comparator; keys are kept.
    pub fn sort_by(&self, mut cmp: impl FnMut(&Value, &Value) -> Ordering) -> Collection {
        let mut data = self.data.clone();
        data.sort_by(|_, a, _, b| cmp(a, b));
        Collection { data }
    }

    /// Natural, case-insensitive sort on keys.
    pub fn sort_keys(&self) -> Collection {
        self.sort_keys_by(|a, b| natural::compare(&a.to_string(), &b.to_string()))
    }

    pub fn sort_keys_by(&self, mut cmp: impl FnMut(&Key, &Key) -> Ordering) -> Collection {
        let mut data = self.data.clone();
        data.sort_by(|a, _, b, _| cmp(a, b));
        Collection { data }
    }

    /// The values in random order, re-indexed from 0.
    pub fn shuffle(&self, rng: &mut impl Rng) -> Collection {
        let mut values: Vec<Value> = self.data.values().cloned().collect();
        values.shuffle(rng);
        Collection::from_values(values)
    }

    /// Up to `num` values picked at random, re-indexed from 0.
    pub fn random(&self, num: usize, rng: &mut impl Rng) -> Collection {
        Collection::from_values(self.shuffle(rng).data.into_values().take(num))
    }

    // ========================================================================
    // Slicing and partitioning
    // ========================================================================

    /// Sub-range by offset, keys kept.
    ///
    /// A negative `offset` counts from the end. `None` runs to the end; a
    /// negative `length` stops that many elements before the end.
    pub fn slice(&self, offset: isize, length: Option<isize>) -> Collection {
        let (start, end) = self.slice_bounds(offset, length);
        self.data
            .iter()
            .skip(start)
            .take(end - start)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Split the slice `(offset, length)` out of the collection, returning
    /// `(extracted, remainder)`.
    pub fn splice(&self, offset: isize, length: Option<isize>) -> (Collection, Collection) {
        let (start, end) = self.slice_bounds(offset, length);
        let mut extracted = IndexMap::new();
        let mut remainder = IndexMap::new();
        for (i, (k, v)) in self.data.iter().enumerate() {
            let target = if (start..end).contains(&i) {
                &mut extracted
            } else {
                &mut remainder
            };
            target.insert(k.clone(), v.clone());
        }
        (
            Collection { data: extracted },
            Collection { data: remainder },
        )
    }

    fn slice_bounds(&self, offset: isize, length: Option<isize>) -> (usize, usize) {
        let len = self.data.len() as isize;
        let start = if offset < 0 {
            (len + offset).max(0)
        } else {
            offset.min(len)
        };
        let end = match length {
            None => len,
            Some(l) if l < 0 => len + l,
            Some(l) => start.saturating_add(l).min(len),
        };
        (start as usize, end.max(start) as usize)
    }

    /// Groups of `size` elements (the last may be shorter), keys kept inside
    /// each group.
    ///
    /// # Errors
    ///
    /// `InputValidation` if `size` is 0.
    pub fn chunk(&self, size: usize) -> Result<Collection, CollectionError> {
        if size == 0 {
            return Err(CollectionError::invalid_input(
                TARGET,
                "chunk size must be at least 1",
            ));
        }
        let entries: Vec<(&Key, &Value)> = self.data.iter().collect();
        Ok(Collection::from_values(entries.chunks(size).map(|group| {
            Value::Array(
                group
                    .iter()
                    .map(|&(k, v)| (k.clone(), v.clone()))
                    .collect(),
            )
        })))
    }

    /// Exactly `groups` groups whose sizes differ by at most one, larger
    /// groups first.
    ///
    /// # Errors
    ///
    /// `InputValidation` if `groups` is 0.
    pub fn split(&self, groups: usize) -> Result<Collection, CollectionError> {
        if groups == 0 {
            return Err(CollectionError::invalid_input(
                TARGET,
                "cannot split into zero groups",
            ));
        }
        let base = self.count() / groups;
        let extra = self.count() % groups;
        let mut entries = self.data.iter();
        let parts: Vec<Value> = (0..groups)
            .map(|i| {
                let size = base + usize::from(i < extra);
                Value::Array(
                    entries
                        .by_ref()
                        .take(size)
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                )
            })
            .collect();
        Ok(Collection::from_values(parts))
    }

    /// Every `nth` element, starting at `offset`.
    ///
    /// # Errors
    ///
    /// `InputValidation` if `nth` is 0.
    pub fn every(&self, nth: usize, offset: isize) -> Result<Collection, CollectionError> {
        if nth == 0 {
            return Err(CollectionError::invalid_input(TARGET, "step must be at least 1"));
        }
        Ok(self.slice(offset, None).filter(|_, _, i| i % nth == 0))
    }

    /// Append `value` until the collection holds at least `size` elements.
    ///
    /// # Errors
    ///
    /// `InputValidation` if the integer keys run out before `size` is reached.
    pub fn pad(
        &self,
        size: usize,
        value: impl Into<Value>,
    ) -> Result<Collection, CollectionError> {
        let value = value.into();
        let mut data = self.data.clone();
        let mut next = self.next_index();
        while data.len() < size {
            let key = next.ok_or_else(next_index_occupied)?;
            data.insert(Key::Int(key), value.clone());
            next = key.checked_add(1);
        }
        Ok(Collection { data })
    }

    /// `[key, value]` pairs, in order.
    pub fn pairs(&self) -> Collection {
        Collection::from_values(self.data.iter().map(|(k, v)| {
            Value::Array(Collection::from_values([Value::from(k), v.clone()]))
        }))
    }

    /// Each value occurring more than once, mapped to the keys where it
    /// occurs.
    pub fn duplicates(&self) -> Collection {
        let mut seen: IndexMap<Key, Vec<Value>> = IndexMap::new();
        for (k, v) in &self.data {
            seen.entry(v.to_key()).or_default().push(Value::from(k));
        }
        seen.into_iter()
            .filter(|(_, keys)| keys.len() > 1)
            .map(|(value, keys)| (value, Value::Array(Collection::from_values(keys))))
            .collect()
    }

    /// Each distinct value mapped to its number of occurrences.
    pub fn frequency(&self) -> Collection {
        let mut counts: IndexMap<Key, i64> = IndexMap::new();
        for v in self.data.values() {
            *counts.entry(v.to_key()).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// Text forms of every value joined by `glue`.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` if a value has no text form.
    pub fn join(&self, glue: &str) -> Result<String, CollectionError> {
        let parts = self
            .data
            .values()
            .map(|v| {
                v.to_text().ok_or_else(|| CollectionError::InvalidOperation {
                    reason: format!("{} values cannot be converted to a string", v.type_name()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(glue))
    }

    // ========================================================================
    // Offsets
    // ========================================================================

    /// Position for `offset`, with negative offsets counted from the end.
    pub fn resolve_offset(&self, offset: isize) -> Option<usize> {
        let len = self.data.len() as isize;
        let position = if offset < 0 { len + offset } else { offset };
        (0..len).contains(&position).then_some(position as usize)
    }

    /// Entry at a position in insertion order.
    pub fn entry_at(&self, position: usize) -> Option<(&Key, &Value)> {
        self.data.get_index(position)
    }

    /// Key at `offset`.
    ///
    /// # Errors
    ///
    /// `OffsetOutOfBounds` if no element sits at `offset`.
    pub fn get_offset_key(&self, offset: isize) -> Result<&Key, CollectionError> {
        self.resolve_offset(offset)
            .and_then(|pos| self.data.get_index(pos))
            .map(|(k, _)| k)
            .ok_or(CollectionError::OffsetOutOfBounds {
                offset,
                len: self.data.len(),
            })
    }

    /// Value at `offset`.
    ///
    /// # Errors
    ///
    /// `OffsetOutOfBounds` if no element sits at `offset`.
    pub fn get_offset(&self, offset: isize) -> Result<&Value, CollectionError> {
        self.resolve_offset(offset)
            .and_then(|pos| self.data.get_index(pos))
            .map(|(_, v)| v)
            .ok_or(CollectionError::OffsetOutOfBounds {
                offset,
                len: self.data.len(),
            })
    }

    pub fn has_offset(&self, offset: isize) -> bool {
        self.resolve_offset(offset).is_some()
    }

    // ========================================================================
    // Iteration and conversion
    // ========================================================================

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.data.iter()
    }

    /// A fresh cursor positioned at the first element.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self)
    }

    /// Deep copy as an array value.
    pub fn to_array(&self) -> Value {
        Value::Array(self.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Array(self)
    }
}

/// Rebuild from entries, renumbering integer keys from 0.
fn renumber(entries: impl Iterator<Item = (Key, Value)>) -> Collection {
    let mut next = 0;
    entries
        .map(|(k, v)| match k {
            Key::Int(_) => {
                let key = Key::Int(next);
                next += 1;
                (key, v)
            }
            key => (key, v),
        })
        .collect()
}

fn next_index_occupied() -> CollectionError {
    CollectionError::invalid_input(TARGET, "the next integer key is already occupied")
}

fn sort_text(value: &Value) -> String {
    value.to_text().unwrap_or_else(|| value.to_string())
}

impl PartialEq for Collection {
    /// Same entries in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.data.len() == other.data.len() && self.data.iter().eq(other.data.iter())
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Collection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Collection {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl IntoIterator for Collection {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl TryFrom<Value> for Collection {
    type Error = CollectionError;

    /// Arrays convert as-is and `Null` becomes an empty collection; any
    /// other value is rejected.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(c) => Ok(c),
            Value::Null => Ok(Collection::new()),
            other => {
                debug!(input_type = other.type_name(), "rejected non-traversable input");
                Err(CollectionError::invalid_input(
                    TARGET,
                    format!("expected traversable data, got {}", other.type_name()),
                ))
            }
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = self.is_list();
        write!(f, "{}", if list { "[" } else { "{" })?;
        for (i, (k, v)) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if list {
                write!(f, "{}", v)?;
            } else {
                write!(f, "{}: {}", k, v)?;
            }
        }
        write!(f, "{}", if list { "]" } else { "}" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array;

    fn coll(v: Value) -> Collection {
        Collection::try_from(v).unwrap()
    }

    #[test]
    fn test_set_returns_copy() {
        let original = coll(array!["a" => 1]);
        let updated = original.set("b", 2);
        assert!(!original.has("b"));
        assert_eq!(updated.get("b"), Some(&Value::from(2)));
    }

    #[test]
    fn test_set_existing_key_keeps_position() {
        let c = coll(array!["a" => 1, "b" => 2]).set("a", 9);
        assert_eq!(c.get_offset_key(0).unwrap(), &Key::from("a"));
        assert_eq!(c.first(), Some(&Value::from(9)));
    }

    #[test]
    fn test_next_index_and_append() {
        let c = coll(array![5 => "x", "name" => "y"]);
        assert_eq!(c.next_index(), Some(6));
        assert_eq!(c.append("z").unwrap().get(6), Some(&Value::from("z")));
        assert_eq!(Collection::new().next_index(), Some(0));
    }

    #[test]
    fn test_append_after_largest_key_fails() {
        let c = coll(array![i64::MAX => "last"]);
        assert_eq!(c.next_index(), None);
        assert!(c.append("new").unwrap_err().is_input_validation());
        assert!(c.pad(3, "x").unwrap_err().is_input_validation());
        assert_eq!(c.pad(1, "x").unwrap(), c);

        let near = coll(array![i64::MAX - 1 => "a"]);
        assert!(near.pad(3, "x").is_err());
        assert_eq!(near.pad(2, "x").unwrap().get(i64::MAX), Some(&Value::from("x")));
    }

    #[test]
    fn test_prepend_renumbers_integer_keys() {
        let c = coll(array![3 => "b", "k" => "c"]).prepend("a");
        assert_eq!(c.to_array(), array![0 => "a", 1 => "b", "k" => "c"]);
    }

    #[test]
    fn test_pop_and_shift() {
        let c = coll(array!["a", "b", "c"]);
        let (last, rest) = c.pop();
        assert_eq!(last, Some(Value::from("c")));
        assert_eq!(rest.count(), 2);

        let (first, rest) = c.shift();
        assert_eq!(first, Some(Value::from("a")));
        assert_eq!(rest.to_array(), array!["b", "c"]);
    }

    #[test]
    fn test_slice_bounds() {
        let c = coll(array![1, 2, 3, 4, 5]);
        assert_eq!(c.slice(1, Some(2)).to_array(), array![1 => 2, 2 => 3]);
        assert_eq!(c.slice(-2, None).to_array(), array![3 => 4, 4 => 5]);
        assert_eq!(c.slice(1, Some(-1)).to_array(), array![1 => 2, 2 => 3, 3 => 4]);
        assert!(c.slice(10, None).is_empty());
        assert!(c.slice(3, Some(-4)).is_empty());
    }

    #[test]
    fn test_resolve_offset() {
        let c = coll(array![1, 2, 3]);
        assert_eq!(c.resolve_offset(0), Some(0));
        assert_eq!(c.resolve_offset(-1), Some(2));
        assert_eq!(c.resolve_offset(-3), Some(0));
        assert_eq!(c.resolve_offset(-4), None);
        assert_eq!(c.resolve_offset(3), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(coll(array![1, "two"]).to_string(), "[1, two]");
        assert_eq!(coll(array!["a" => 1]).to_string(), "{a: 1}");
    }
}
