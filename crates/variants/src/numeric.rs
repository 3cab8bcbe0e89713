//! # Numeric Series
//!
//! A collection whose every value passes the numeric test (integers, floats
//! and numeric strings). Adds arithmetic updates and the usual descriptive
//! statistics.
//!
//! ## Statistics on empty series
//!
//! `sum` of an empty series is `Int(0)`. Every other statistic returns
//! `None`, since there is no meaningful average or median of nothing.
//!
//! ## Mode ties
//!
//! When several values share the highest count, the one that occurs first
//! wins.

use std::ops::Deref;

use indexmap::IndexMap;
use shaped_core::{Collection, CollectionError, Key, Kind, Number, Value};
use tracing::debug;

use crate::Variant;

const TARGET: &str = "NumericSeries";

/// A collection of numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericSeries {
    inner: Collection,
}

impl NumericSeries {
    /// Build a series from array data.
    ///
    /// # Errors
    ///
    /// `InputValidation` if the data is not traversable or holds a
    /// non-numeric value.
    pub fn new(data: impl Into<Value>) -> Result<Self, CollectionError> {
        Self::from_collection(Collection::try_from(data.into())?)
    }

    fn check(value: &Value) -> Result<(), CollectionError> {
        if value.is_numeric() {
            return Ok(());
        }
        debug!(value = %value, value_type = value.type_name(), "numeric series rejected value");
        Err(CollectionError::invalid_input(
            TARGET,
            format!("{} value \"{}\" is not numeric", value.type_name(), value),
        ))
    }

    /// Numeric readings of every value, in order.
    pub fn numbers(&self) -> impl Iterator<Item = Number> + '_ {
        self.inner.iter().filter_map(|(_, v)| v.as_number())
    }

    // ========================================================================
    // Validated insertion
    // ========================================================================

    pub fn set(
        &self,
        key: impl Into<Key>,
        value: impl Into<Value>,
    ) -> Result<Self, CollectionError> {
        let value = value.into();
        Self::check(&value)?;
        Ok(Self {
            inner: self.inner.set(key, value),
        })
    }

    pub fn add(
        &self,
        key: impl Into<Key>,
        value: impl Into<Value>,
    ) -> Result<Self, CollectionError> {
        let value = value.into();
        Self::check(&value)?;
        Ok(Self {
            inner: self.inner.add(key, value),
        })
    }

    pub fn append(&self, value: impl Into<Value>) -> Result<Self, CollectionError> {
        let value = value.into();
        Self::check(&value)?;
        Ok(Self {
            inner: self.inner.append(value)?,
        })
    }

    pub fn prepend(&self, value: impl Into<Value>) -> Result<Self, CollectionError> {
        let value = value.into();
        Self::check(&value)?;
        Ok(Self {
            inner: self.inner.prepend(value),
        })
    }

    /// Add `interval` to the value at `key`. A missing key counts from 0.
    pub fn increment(&self, key: impl Into<Key>, interval: impl Into<Number>) -> Self {
        let key = key.into();
        let current = self.number_at(&key);
        Self {
            inner: self.inner.set(key, current.add(interval.into())),
        }
    }

    /// Subtract `interval` from the value at `key`. A missing key counts
    /// from 0.
    pub fn decrement(&self, key: impl Into<Key>, interval: impl Into<Number>) -> Self {
        let key = key.into();
        let current = self.number_at(&key);
        Self {
            inner: self.inner.set(key, current.sub(interval.into())),
        }
    }

    fn number_at(&self, key: &Key) -> Number {
        self.inner
            .as_map()
            .get(key)
            .and_then(Value::as_number)
            .unwrap_or(Number::Int(0))
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Sum of all values; integral until it would overflow.
    pub fn sum(&self) -> Number {
        self.numbers().fold(Number::Int(0), Number::add)
    }

    pub fn average(&self) -> Option<f64> {
        if self.inner.is_empty() {
            return None;
        }
        Some(self.sum().as_f64() / self.inner.count() as f64)
    }

    /// Middle value after a numeric sort; the mean of the two middle values
    /// for an even count.
    pub fn median(&self) -> Option<f64> {
        let mut sorted: Vec<Number> = self.numbers().collect();
        sorted.sort_by(|a, b| a.total_cmp(*b));
        let mid = sorted.len() / 2;
        match sorted.len() {
            0 => None,
            n if n % 2 == 1 => Some(sorted[mid].as_f64()),
            _ => Some((sorted[mid - 1].as_f64() + sorted[mid].as_f64()) / 2.0),
        }
    }

    pub fn max(&self) -> Option<Number> {
        self.numbers().reduce(|best, n| match n.total_cmp(best) {
            std::cmp::Ordering::Greater => n,
            _ => best,
        })
    }

    pub fn min(&self) -> Option<Number> {
        self.numbers().reduce(|best, n| match n.total_cmp(best) {
            std::cmp::Ordering::Less => n,
            _ => best,
        })
    }

    /// Most frequent value.
    pub fn mode(&self) -> Option<Number> {
        let mut tally: IndexMap<Key, (Number, usize)> = IndexMap::new();
        for (_, value) in self.inner.iter() {
            if let Some(n) = value.as_number() {
                tally.entry(value.to_key()).or_insert((n, 0)).1 += 1;
            }
        }
        let mut best: Option<(Number, usize)> = None;
        for (n, count) in tally.into_values() {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((n, count));
            }
        }
        best.map(|(n, _)| n)
    }

    /// Each distinct value mapped to its number of occurrences, in order of
    /// first occurrence.
    pub fn counts(&self) -> NumericSeries {
        NumericSeries {
            inner: self.inner.frequency(),
        }
    }

    pub fn as_collection(&self) -> &Collection {
        &self.inner
    }
}

impl Deref for NumericSeries {
    type Target = Collection;

    fn deref(&self) -> &Collection {
        &self.inner
    }
}

impl Variant for NumericSeries {
    const KIND: Kind = Kind::Numeric;

    fn from_collection(collection: Collection) -> Result<Self, CollectionError> {
        for (_, value) in collection.iter() {
            Self::check(value)?;
        }
        Ok(Self { inner: collection })
    }

    fn into_collection(self) -> Collection {
        self.inner
    }
}
