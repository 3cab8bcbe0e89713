//! Multi-dimensional collections: data with at least one nested array.
//!
//! Searches recurse. After a miss at the top level, every nested array is
//! run through the factory and searched as whatever variant it classifies
//! as, with the same needle and key filter. A nested table therefore
//! searches its rows, and a nested nested array recurses again.

use std::ops::Deref;

use shaped_core::{Collection, CollectionError, Key, KeyFilter, Kind, Needle, Value};
use tracing::{debug, trace};

use crate::factory::Factory;
use crate::Variant;

const TARGET: &str = "MultiDimensional";

/// A collection containing nested arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiDimensional {
    inner: Collection,
}

impl MultiDimensional {
    pub fn new(data: impl Into<Value>) -> Result<Self, CollectionError> {
        Self::from_collection(Collection::try_from(data.into())?)
    }

    /// Recursive `contains`.
    pub fn contains(&self, value: impl Into<Value>, at: impl Into<KeyFilter>) -> bool {
        let value = value.into();
        self.contains_needle(&Needle::Value(&value), &at.into())
    }

    /// Recursive `contains_where`.
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

/// Flat search of `collection`, then a search of each nested array as the
/// variant it classifies as. The first match wins.
pub(crate) fn nested_contains(
    collection: &Collection,
    needle: &Needle<'_>,
    at: &KeyFilter,
) -> bool {
    if collection.contains_needle(needle, at) {
        return true;
    }
    collection.iter().any(|(key, value)| {
        let Value::Array(nested) = value else {
            return false;
        };
        trace!(%key, len = nested.count(), "searching nested collection");
        match Factory::create(Value::Array(nested.clone())) {
            Ok(any) => any.contains_needle(needle, at),
            Err(err) => {
                trace!(%key, error = %err, "nested collection could not be specialized");
                nested.contains_needle(needle, at)
            }
        }
    })
}

impl Deref for MultiDimensional {
    type Target = Collection;

    fn deref(&self) -> &Collection {
        &self.inner
    }
}

impl Variant for MultiDimensional {
    const KIND: Kind = Kind::MultiDimensional;

    fn from_collection(collection: Collection) -> Result<Self, CollectionError> {
        if !collection.iter().any(|(_, v)| v.is_traversable()) {
            debug!(len = collection.count(), "multi-dimensional rejected flat data");
            return Err(CollectionError::invalid_input(
                TARGET,
                "at least one value must be an array",
            ));
        }
        Ok(Self { inner: collection })
    }

    fn into_collection(self) -> Collection {
        self.inner
    }
}
