//! # Shapes - Classifying Input Data
//!
//! Before a collection is built, its input is inspected and given a `Kind`:
//! the most specific variant the data satisfies. The predicates here are
//! pure functions over `&Value` and never fail; the factory in
//! `shaped-variants` turns a `Kind` into a concrete collection.
//!
//! ## Check order
//!
//! Several predicates can hold at once (a table is also multi-dimensional),
//! so `classify` applies them in a fixed order:
//!
//! 1. all objects
//! 2. tabular
//! 3. multi-dimensional
//! 4. all numeric
//! 5. character set
//! 6. generic

use std::fmt;

use crate::collection::Collection;
use crate::value::Value;

/// The variant a piece of input data classifies as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Generic,
    Characters,
    Numeric,
    Objects,
    MultiDimensional,
    Tabular,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Generic => "generic",
            Kind::Characters => "characters",
            Kind::Numeric => "numeric",
            Kind::Objects => "objects",
            Kind::MultiDimensional => "multi-dimensional",
            Kind::Tabular => "tabular",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Whether `data` can be iterated as a collection.
pub fn is_traversable(data: &Value) -> bool {
    data.is_traversable()
}

/// Non-empty array whose every element is an object.
pub fn is_all_objects(data: &Value) -> bool {
    match data.as_collection() {
        Some(c) => !c.is_empty() && c.iter().all(|(_, v)| v.is_object()),
        None => false,
    }
}

/// Non-empty array of non-empty rows sharing one ordered key list, with no
/// array-valued cells.
pub fn is_tabular(data: &Value) -> bool {
    let Some(rows) = data.as_collection() else {
        return false;
    };
    let mut rows = rows.iter().map(|(_, row)| row.as_collection());
    let Some(Some(first)) = rows.next() else {
        return false;
    };
    let is_flat_row = |row: &Collection| {
        !row.is_empty() && row.iter().all(|(_, cell)| !cell.is_traversable())
    };
    if !is_flat_row(first) {
        return false;
    }
    rows.all(|row| match row {
        Some(row) => is_flat_row(row) && row.as_map().keys().eq(first.as_map().keys()),
        None => false,
    })
}

/// Non-empty array with at least one array element.
pub fn is_multi_dimensional(data: &Value) -> bool {
    match data.as_collection() {
        Some(c) => c.iter().any(|(_, v)| v.is_traversable()),
        None => false,
    }
}

/// Non-empty array whose every element passes the numeric test.
pub fn is_all_numeric(data: &Value) -> bool {
    match data.as_collection() {
        Some(c) => !c.is_empty() && c.iter().all(|(_, v)| v.is_numeric()),
        None => false,
    }
}

/// A string or numeric scalar, which becomes a sequence of characters.
pub fn is_character_set(data: &Value) -> bool {
    matches!(data, Value::Str(_) | Value::Int(_) | Value::Float(_))
}

/// Classify `data` in the fixed check order.
pub fn classify(data: &Value) -> Kind {
    if is_all_objects(data) {
        Kind::Objects
    } else if is_tabular(data) {
        Kind::Tabular
    } else if is_multi_dimensional(data) {
        Kind::MultiDimensional
    } else if is_all_numeric(data) {
        Kind::Numeric
    } else if is_character_set(data) {
        Kind::Characters
    } else {
        Kind::Generic
    }
}
