//! # AnyCollection
//!
//! The closed set of collection variants, as chosen by the factory. Every
//! variant dereferences to `Collection`, and so does `AnyCollection`, so the
//! core operation set works on any of them.
//!
//! A handful of operations behave differently per variant and are
//! dispatched here:
//!
//! | Operation | Differs for |
//! |---|---|
//! | `contains`, `contains_where` | multi-dimensional and tabular (recursive) |
//! | `map` | character sequences (re-joined), tables (row-wise); others re-specialized |
//! | `pad` | object sets (fill is duplicated per slot) |
//! | `join` | object sets (always fails) |

use std::fmt;
use std::ops::Deref;

use shaped_core::{Collection, CollectionError, Key, KeyFilter, Kind, Needle, Value};

use crate::chars::CharSequence;
use crate::factory::Factory;
use crate::multi::MultiDimensional;
use crate::numeric::NumericSeries;
use crate::objects::ObjectSet;
use crate::tabular::Tabular;
use crate::Variant;

/// A collection of whichever variant its data classified as.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyCollection {
    Generic(Collection),
    Characters(CharSequence),
    Numeric(NumericSeries),
    Objects(ObjectSet),
    MultiDimensional(MultiDimensional),
    Tabular(Tabular),
}

impl AnyCollection {
    /// Re-run classification over an existing collection.
    pub fn specialize(collection: Collection) -> Result<AnyCollection, CollectionError> {
        Factory::create(collection)
    }

    pub fn kind(&self) -> Kind {
        match self {
            AnyCollection::Generic(_) => Kind::Generic,
            AnyCollection::Characters(_) => CharSequence::KIND,
            AnyCollection::Numeric(_) => NumericSeries::KIND,
            AnyCollection::Objects(_) => ObjectSet::KIND,
            AnyCollection::MultiDimensional(_) => MultiDimensional::KIND,
            AnyCollection::Tabular(_) => Tabular::KIND,
        }
    }

    pub fn as_collection(&self) -> &Collection {
        match self {
            AnyCollection::Generic(c) => c,
            AnyCollection::Characters(c) => c,
            AnyCollection::Numeric(c) => c,
            AnyCollection::Objects(c) => c,
            AnyCollection::MultiDimensional(c) => c,
            AnyCollection::Tabular(c) => c,
        }
    }

    pub fn into_collection(self) -> Collection {
        match self {
            AnyCollection::Generic(c) => c,
            AnyCollection::Characters(c) => c.into_collection(),
            AnyCollection::Numeric(c) => c.into_collection(),
            AnyCollection::Objects(c) => c.into_collection(),
            AnyCollection::MultiDimensional(c) => c.into_collection(),
            AnyCollection::Tabular(c) => c.into_collection(),
        }
    }

    pub fn as_chars(&self) -> Option<&CharSequence> {
        match self {
            AnyCollection::Characters(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<&NumericSeries> {
        match self {
            AnyCollection::Numeric(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_objects(&self) -> Option<&ObjectSet> {
        match self {
            AnyCollection::Objects(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_multi(&self) -> Option<&MultiDimensional> {
        match self {
            AnyCollection::MultiDimensional(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_tabular(&self) -> Option<&Tabular> {
        match self {
            AnyCollection::Tabular(c) => Some(c),
            _ => None,
        }
    }

    // ========================================================================
    // Variant-dispatched operations
    // ========================================================================

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
        match self {
            AnyCollection::MultiDimensional(c) => c.contains_needle(needle, at),
            AnyCollection::Tabular(c) => c.contains_needle(needle, at),
            other => other.as_collection().contains_needle(needle, at),
        }
    }

    /// Transform every value. Character sequences re-join into a new
    /// sequence and tables map row by row; every other result is classified
    /// afresh.
    pub fn map(
        &self,
        mut f: impl FnMut(&Value, &Key, usize) -> Value,
    ) -> Result<AnyCollection, CollectionError> {
        match self {
            AnyCollection::Characters(c) => c.map(f).map(AnyCollection::Characters),
            AnyCollection::Tabular(t) => {
                let mut position = 0;
                Self::specialize(t.map_rows(|row, key| {
                    let mapped = f(&Value::Array(row.clone()), key, position);
                    position += 1;
                    mapped
                }))
            }
            other => Self::specialize(other.as_collection().map(f)),
        }
    }

    /// Append `value` until the collection holds `size` elements.
    ///
    /// # Errors
    ///
    /// `InputValidation` if the padded data no longer fits the variant
    /// (a non-object fill for an object set).
    pub fn pad(
        &self,
        size: usize,
        value: impl Into<Value>,
    ) -> Result<AnyCollection, CollectionError> {
        let value: Value = value.into();
        match (self, value) {
            (AnyCollection::Objects(set), Value::Object(fill)) => {
                set.pad(size, &fill).map(AnyCollection::Objects)
            }
            (AnyCollection::Objects(_), other) => Err(CollectionError::invalid_input(
                "ObjectSet",
                format!("cannot pad with {}", other.type_name()),
            )),
            (other, value) => Self::specialize(other.as_collection().pad(size, value)?),
        }
    }

    /// # Errors
    ///
    /// `InvalidOperation` for object sets, or if a value has no text form.
    pub fn join(&self, glue: &str) -> Result<String, CollectionError> {
        match self {
            AnyCollection::Objects(set) => set.join(glue),
            other => other.as_collection().join(glue),
        }
    }
}

impl Deref for AnyCollection {
    type Target = Collection;

    fn deref(&self) -> &Collection {
        self.as_collection()
    }
}

impl TryFrom<Value> for AnyCollection {
    type Error = CollectionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Factory::create(value)
    }
}

impl From<AnyCollection> for Value {
    fn from(any: AnyCollection) -> Self {
        any.into_collection().into_value()
    }
}

impl From<Collection> for AnyCollection {
    /// Wraps as `Generic` without classifying; see [`AnyCollection::specialize`].
    fn from(c: Collection) -> Self {
        AnyCollection::Generic(c)
    }
}

impl From<CharSequence> for AnyCollection {
    fn from(c: CharSequence) -> Self {
        AnyCollection::Characters(c)
    }
}

impl From<ObjectSet> for AnyCollection {
    fn from(c: ObjectSet) -> Self {
        AnyCollection::Objects(c)
    }
}

impl From<MultiDimensional> for AnyCollection {
    fn from(c: MultiDimensional) -> Self {
        AnyCollection::MultiDimensional(c)
    }
}

impl From<NumericSeries> for AnyCollection {
    fn from(c: NumericSeries) -> Self {
        AnyCollection::Numeric(c)
    }
}

impl From<Tabular> for AnyCollection {
    fn from(c: Tabular) -> Self {
        AnyCollection::Tabular(c)
    }
}

impl fmt::Display for AnyCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_collection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shaped_core::{array, Object};

    #[test]
    fn test_map_respecializes() {
        let words = Factory::create(array!["1", "x"]).unwrap();
        assert_eq!(words.kind(), Kind::Generic);
        let numbers = words.map(|_, _, i| Value::from(i)).unwrap();
        assert_eq!(numbers.kind(), Kind::Numeric);
    }

    #[test]
    fn test_map_characters() {
        let seq = Factory::create("ab").unwrap();
        let doubled = seq
            .map(|v, _, _| Value::from(v.as_str().unwrap_or_default().repeat(2)))
            .unwrap();
        assert_eq!(doubled.kind(), Kind::Characters);
        assert_eq!(doubled.as_chars().unwrap().text(), "aabb");
    }

    #[test]
    fn test_map_tables_row_by_row() {
        let table = Factory::create(array![
            "r1" => array!["id" => 1, "name" => "luke"],
            "r2" => array!["id" => 2, "name" => "leia"],
        ])
        .unwrap();
        assert_eq!(table.kind(), Kind::Tabular);

        let mut seen = Vec::new();
        let ids = table
            .map(|row, key, i| {
                seen.push((key.clone(), i));
                row.as_collection().and_then(|r| r.get("id")).cloned().unwrap_or_default()
            })
            .unwrap();
        assert_eq!(ids.kind(), Kind::Numeric);
        assert_eq!(ids.to_array(), array!["r1" => 1, "r2" => 2]);
        assert_eq!(seen, vec![(Key::from("r1"), 0), (Key::from("r2"), 1)]);
    }

    #[test]
    fn test_pad_objects_requires_object() {
        let set = Factory::create(Value::from(vec![Object::new("User")])).unwrap();
        assert!(set.pad(3, 1).is_err());
        assert_eq!(set.pad(3, Object::new("User")).unwrap().count(), 3);
    }

    #[test]
    fn test_value_round_trip() {
        let any = Factory::create(array![3, 1, 2]).unwrap();
        let again = Factory::create(Value::from(any.clone())).unwrap();
        assert_eq!(again, any);
    }
}
