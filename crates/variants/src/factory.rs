//! The factory: classify data, then build the most specific collection.

use shaped_core::shape;
use shaped_core::{Collection, CollectionError, Kind, Value};
use tracing::debug;

use crate::any::AnyCollection;
use crate::chars::CharSequence;
use crate::multi::MultiDimensional;
use crate::numeric::NumericSeries;
use crate::objects::ObjectSet;
use crate::tabular::Tabular;
use crate::Variant;

/// Namespace for collection construction.
///
/// All functions are associated functions; `Factory` carries no state.
pub struct Factory;

impl Factory {
    /// Classify `data` and build the matching variant, falling back to a
    /// generic collection.
    ///
    /// `Null` yields an empty generic collection.
    ///
    /// # Errors
    ///
    /// `InputValidation` if `data` is neither traversable nor a character
    /// set (`Bool`, `Object`), or if the chosen variant rejects it.
    pub fn create(data: impl Into<Value>) -> Result<AnyCollection, CollectionError> {
        let data = data.into();
        let kind = shape::classify(&data);
        debug!(%kind, input_type = data.type_name(), "classified collection input");
        match kind {
            Kind::Objects => ObjectSet::new(data).map(AnyCollection::Objects),
            Kind::Tabular => Tabular::new(data).map(AnyCollection::Tabular),
            Kind::MultiDimensional => {
                MultiDimensional::new(data).map(AnyCollection::MultiDimensional)
            }
            Kind::Numeric => NumericSeries::new(data).map(AnyCollection::Numeric),
            Kind::Characters => CharSequence::new(data).map(AnyCollection::Characters),
            Kind::Generic => Collection::try_from(data).map(AnyCollection::Generic),
        }
    }

    /// Build a specific variant, skipping classification.
    ///
    /// ```rust
    /// use shaped_variants::{array, Factory, Number, NumericSeries};
    ///
    /// let series: NumericSeries = Factory::build(array![1, 2, 3]).unwrap();
    /// assert_eq!(series.sum(), Number::Int(6));
    /// ```
    pub fn build<V: Variant>(data: impl Into<Value>) -> Result<V, CollectionError> {
        V::from_collection(Collection::try_from(data.into())?)
    }

    /// Parse a JSON document and classify the result.
    ///
    /// # Errors
    ///
    /// `InputValidation` if the text is not valid JSON, or as for
    /// [`Factory::create`].
    pub fn from_json(text: &str) -> Result<AnyCollection, CollectionError> {
        let value: Value = serde_json::from_str(text).map_err(|err| {
            debug!(error = %err, "rejected malformed JSON input");
            CollectionError::invalid_input("Factory", err.to_string())
        })?;
        Self::create(value)
    }
}

/// Shorthand for [`Factory::create`].
pub fn collect(data: impl Into<Value>) -> Result<AnyCollection, CollectionError> {
    Factory::create(data)
}
