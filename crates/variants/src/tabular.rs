//! # Tabular Collections
//!
//! Rows of homogeneous key→value records. Every row is a non-empty array,
//! all rows share one ordered key list (the columns), and no cell is itself
//! an array.
//!
//! ## Column delegation
//!
//! Statistics and set operations can be applied to a single column by name:
//!
//! ```rust
//! use shaped_variants::{array, Tabular, Value};
//!
//! let table = Tabular::new(array![
//!     array!["city" => "Oslo", "temp" => 4],
//!     array!["city" => "Rome", "temp" => 18],
//! ])
//! .unwrap();
//!
//! assert_eq!(table.call("max", "temp").unwrap(), Value::from(18));
//! assert!(table.call("explode", "temp").is_err());
//! ```
//!
//! The operation set is closed ([`ColumnOp`]); `call` parses a name into it.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use shaped_core::shape;
use shaped_core::{Collection, CollectionError, Key, KeyFilter, Kind, Needle, Value};
use tracing::{debug, trace};

use crate::any::AnyCollection;
use crate::factory::Factory;
use crate::multi::nested_contains;
use crate::numeric::NumericSeries;
use crate::Variant;

const TARGET: &str = "Tabular";

/// Operations that can be applied to one column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnOp {
    Sum,
    Average,
    Mode,
    Median,
    Max,
    Min,
    Counts,
    Count,
    Frequency,
    Unique,
    First,
    Last,
}

impl ColumnOp {
    pub const ALL: [ColumnOp; 12] = [
        ColumnOp::Sum,
        ColumnOp::Average,
        ColumnOp::Mode,
        ColumnOp::Median,
        ColumnOp::Max,
        ColumnOp::Min,
        ColumnOp::Counts,
        ColumnOp::Count,
        ColumnOp::Frequency,
        ColumnOp::Unique,
        ColumnOp::First,
        ColumnOp::Last,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColumnOp::Sum => "sum",
            ColumnOp::Average => "average",
            ColumnOp::Mode => "mode",
            ColumnOp::Median => "median",
            ColumnOp::Max => "max",
            ColumnOp::Min => "min",
            ColumnOp::Counts => "counts",
            ColumnOp::Count => "count",
            ColumnOp::Frequency => "frequency",
            ColumnOp::Unique => "unique",
            ColumnOp::First => "first",
            ColumnOp::Last => "last",
        }
    }

    /// Whether the operation needs a numeric column.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ColumnOp::Sum
                | ColumnOp::Average
                | ColumnOp::Mode
                | ColumnOp::Median
                | ColumnOp::Max
                | ColumnOp::Min
                | ColumnOp::Counts
        )
    }

    fn not_found(self) -> CollectionError {
        CollectionError::MethodNotFound {
            target: TARGET,
            method: self.name().to_string(),
        }
    }
}

impl fmt::Display for ColumnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for ColumnOp {
    type Err = CollectionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ColumnOp::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| CollectionError::MethodNotFound {
                target: TARGET,
                method: name.to_string(),
            })
    }
}

/// A table of homogeneous rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Tabular {
    inner: Collection,
}

impl Tabular {
    pub fn new(data: impl Into<Value>) -> Result<Self, CollectionError> {
        Self::from_collection(Collection::try_from(data.into())?)
    }

    fn first_row(&self) -> Option<&Collection> {
        self.inner.first().and_then(Value::as_collection)
    }

    /// Column names, in row order.
    pub fn columns(&self) -> Collection {
        self.first_row().map(Collection::keys).unwrap_or_default()
    }

    pub fn has_column(&self, column: impl Into<Key>) -> bool {
        let column = column.into();
        self.first_row().is_some_and(|row| row.has(column))
    }

    /// Every row's cell for `column`, in row order and re-indexed from 0.
    ///
    /// # Errors
    ///
    /// `ColumnNotFound` if the table has no such column.
    pub fn get_column(&self, column: impl Into<Key>) -> Result<Collection, CollectionError> {
        let column = column.into();
        if !self.has_column(column.clone()) {
            return Err(CollectionError::ColumnNotFound { column });
        }
        Ok(Collection::from_values(
            self.rows().filter_map(|(_, row)| row.get(column.clone()).cloned()),
        ))
    }

    /// Like `get_column`, but `None` for a missing column.
    pub fn column(&self, column: impl Into<Key>) -> Option<Collection> {
        self.get_column(column).ok()
    }

    pub fn has_row(&self, offset: isize) -> bool {
        self.inner.has_offset(offset)
    }

    /// The row at `offset`, specialized through the factory.
    ///
    /// # Errors
    ///
    /// `RowNotFound` if no row sits at `offset`.
    pub fn get_row(&self, offset: isize) -> Result<AnyCollection, CollectionError> {
        let row = self
            .inner
            .get_offset(offset)
            .map_err(|_| CollectionError::RowNotFound { offset })?;
        Factory::create(row.clone())
    }

    /// Rows with their keys, in order.
    pub fn rows(&self) -> impl Iterator<Item = (&Key, &Collection)> + '_ {
        self.inner
            .iter()
            .filter_map(|(key, row)| row.as_collection().map(|row| (key, row)))
    }

    /// Transform each row into a value; row keys are kept.
    pub fn map_rows(&self, mut f: impl FnMut(&Collection, &Key) -> Value) -> Collection {
        self.rows().map(|(key, row)| (key.clone(), f(row, key))).collect()
    }

    /// Visit every row.
    pub fn walk_rows(&self, mut f: impl FnMut(&Collection, &Key)) -> &Self {
        for (key, row) in self.rows() {
            f(row, key);
        }
        self
    }

    /// A copy with the row at `key` replaced or added.
    ///
    /// # Errors
    ///
    /// `InputValidation` if the row does not fit the table.
    pub fn set_row(
        &self,
        key: impl Into<Key>,
        row: impl Into<Value>,
    ) -> Result<Self, CollectionError> {
        Self::from_collection(self.inner.set(key, row))
    }

    pub fn append_row(&self, row: impl Into<Value>) -> Result<Self, CollectionError> {
        Self::from_collection(self.inner.append(row)?)
    }

    /// Apply `op` to one column.
    ///
    /// # Errors
    ///
    /// `MethodNotFound` if the column is missing, or if `op` is numeric and
    /// the column is not.
    pub fn delegate(&self, op: ColumnOp, column: impl Into<Key>) -> Result<Value, CollectionError> {
        let column = column.into();
        trace!(op = op.name(), %column, "delegating to column");
        let cells = self.column(column.clone()).ok_or_else(|| {
            debug!(op = op.name(), %column, "delegation to missing column");
            op.not_found()
        })?;

        if op.is_numeric() {
            let series = NumericSeries::from_collection(cells).map_err(|_| {
                debug!(op = op.name(), %column, "numeric delegation to non-numeric column");
                op.not_found()
            })?;
            return Ok(match op {
                ColumnOp::Sum => series.sum().into(),
                ColumnOp::Average => series.average().into(),
                ColumnOp::Median => series.median().into(),
                ColumnOp::Mode => series.mode().into(),
                ColumnOp::Max => series.max().into(),
                ColumnOp::Min => series.min().into(),
                _ => series.counts().into_collection().into_value(),
            });
        }

        Ok(match op {
            ColumnOp::Count => Value::from(cells.count()),
            ColumnOp::Frequency => cells.frequency().into_value(),
            ColumnOp::Unique => cells.unique().into_value(),
            ColumnOp::First => cells.first().cloned().unwrap_or_default(),
            _ => cells.last().cloned().unwrap_or_default(),
        })
    }

    /// Apply the operation named `method` to one column.
    ///
    /// # Errors
    ///
    /// `MethodNotFound` if the name is unknown, or as for
    /// [`Tabular::delegate`].
    pub fn call(&self, method: &str, column: impl Into<Key>) -> Result<Value, CollectionError> {
        let op = method.parse::<ColumnOp>()?;
        self.delegate(op, column)
    }

    /// Recursive `contains`: a value matches if any cell matches.
    pub fn contains(&self, value: impl Into<Value>, at: impl Into<KeyFilter>) -> bool {
        let value = value.into();
        self.contains_needle(&Needle::Value(&value), &at.into())
    }

    pub fn contains_where(
        &self,
        pred: impl Fn(&Value, &Key) -> bool,
        at: impl Into<KeyFilter>,
    ) -> bool {
        self.contains_needle(&Needle::Matching(&pred), &at.into())
    }

    pub fn contains_needle(&self, needle: &Needle<'_>, at: &KeyFilter) -> bool {
        nested_contains(&self.inner, needle, at)
    }
}

impl Deref for Tabular {
    type Target = Collection;

    fn deref(&self) -> &Collection {
        &self.inner
    }
}

impl Variant for Tabular {
    const KIND: Kind = Kind::Tabular;

    fn from_collection(collection: Collection) -> Result<Self, CollectionError> {
        let value = collection.into_value();
        if !shape::is_tabular(&value) {
            debug!("tabular rejected non-homogeneous rows");
            return Err(CollectionError::invalid_input(
                TARGET,
                "rows must be non-empty arrays sharing one key list, with no nested cells",
            ));
        }
        match value {
            Value::Array(inner) => Ok(Self { inner }),
            _ => Err(CollectionError::invalid_input(TARGET, "expected rows")),
        }
    }

    fn into_collection(self) -> Collection {
        self.inner
    }
}
