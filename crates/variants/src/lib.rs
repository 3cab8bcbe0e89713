//! # Variants - Shape-Dispatched Collections
//!
//! This crate layers specialized collections over `shaped_core::Collection`
//! and picks the right one for a piece of data:
//!
//! - **Numeric series**: sums, averages, medians, modes and counts
//! - **Character sequences**: strings as collections of characters
//! - **Object sets**: collections of (optionally single-class) objects
//! - **Multi-dimensional**: nested arrays with recursive search
//! - **Tabular**: homogeneous rows with column access and delegation
//!
//! ## Core Concepts
//!
//! - **Data decides the type**: `collect` classifies its input and returns
//!   the most specific variant as an [`AnyCollection`]
//! - **Constraints hold forever**: every variant validates its data on
//!   construction and on every inserting call
//! - **Everything is still a collection**: each variant dereferences to
//!   `Collection`, so the whole core operation set stays available
//!
//! ## Example: Column Statistics
//!
//! ```rust
//! use shaped_variants::{array, collect, ColumnOp, Kind, Value};
//!
//! let users = collect(array![
//!     array!["id" => 1, "name" => "luke", "age" => 23],
//!     array!["id" => 2, "name" => "leia", "age" => 27],
//! ])
//! .unwrap();
//!
//! assert_eq!(users.kind(), Kind::Tabular);
//! let table = users.as_tabular().unwrap();
//! assert_eq!(table.get_column("id").unwrap().to_array(), array![1, 2]);
//! assert_eq!(table.delegate(ColumnOp::Average, "age").unwrap(), Value::from(25.0));
//! ```

mod any;
mod chars;
mod factory;
mod multi;
mod numeric;
mod objects;
mod tabular;

pub use any::AnyCollection;
pub use chars::CharSequence;
pub use factory::{collect, Factory};
pub use multi::MultiDimensional;
pub use numeric::NumericSeries;
pub use objects::ObjectSet;
pub use tabular::{ColumnOp, Tabular};

pub use shaped_core::*;

use std::ops::Deref;

/// A specialized collection: a `Collection` plus a constraint on its data.
///
/// Implementors validate in `from_collection` and keep the constraint on
/// every inserting call, so a value of the type is always valid.
pub trait Variant: Deref<Target = Collection> + Sized {
    /// The kind the classifier assigns to data of this variant.
    const KIND: Kind;

    /// Wrap `collection`, failing with `InputValidation` if it violates the
    /// variant's constraint.
    fn from_collection(collection: Collection) -> Result<Self, CollectionError>;

    fn into_collection(self) -> Collection;
}
