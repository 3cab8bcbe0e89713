//! # Core - Ordered Collections
//!
//! This crate provides the value model and the universal collection
//! operation set:
//!
//! - **Keys**: integer or string keys with integer-string normalization
//! - **Values**: scalars, nested arrays and reference-typed objects
//! - **Collections**: an ordered key→value map with functional operations
//! - **Cursors**: explicit, independent iteration state
//! - **Shapes**: classification of input data into collection kinds
//! - **Errors**: one error enum shared by every collection
//!
//! ## Design Philosophy
//!
//! Collections are values. Every operation returns a new collection and
//! leaves its receiver untouched, so chains read top to bottom:
//!
//! ```rust
//! use shaped_core::{array, Collection, Value};
//!
//! let scores = Collection::try_from(array![3, 1, 2]).unwrap();
//! let top = scores.sort().reverse().values().slice(0, Some(2));
//!
//! assert_eq!(top.to_array(), array![3, 2]);
//! assert_eq!(scores.first(), Some(&Value::from(3)));
//! ```

pub mod collection;
pub mod cursor;
pub mod error;
mod json;
pub mod key;
pub mod natural;
pub mod shape;
pub mod value;

// Re-export key types at crate root for convenience
pub use collection::{Collection, KeyFilter, Needle};
pub use cursor::Cursor;
pub use error::CollectionError;
pub use key::Key;
pub use shape::{classify, Kind};
pub use value::{Number, Object, Value};

/// Build a `Value::Array` literal.
///
/// Either a list (`array![1, "two", 3.0]`, keyed `0, 1, 2`) or key/value
/// pairs (`array!["id" => 1, 7 => "seven"]`). Keys go through `Key::from`,
/// so `"7"` and `7` are the same key; values go through `Value::from`.
#[macro_export]
macro_rules! array {
    () => {
        $crate::Value::Array($crate::Collection::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Value::Array(
            [$(($crate::Key::from($key), $crate::Value::from($value))),+]
                .into_iter()
                .collect::<$crate::Collection>(),
        )
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Value::Array($crate::Collection::from_values([
            $($crate::Value::from($value)),+
        ]))
    };
}
