//! Character sequences: a string held as a collection of one-character
//! strings, keyed `0..n`.

use std::ops::Deref;

use shaped_core::{Collection, CollectionError, Key, Kind, Value};
use tracing::debug;

use crate::Variant;

const TARGET: &str = "CharSequence";

/// A string as a collection of its characters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharSequence {
    inner: Collection,
}

impl CharSequence {
    /// Build a sequence from a string or numeric scalar (split into
    /// characters), or from an array of single characters.
    pub fn new(data: impl Into<Value>) -> Result<Self, CollectionError> {
        match data.into() {
            Value::Str(s) => Ok(Self::from_text(&s)),
            n @ (Value::Int(_) | Value::Float(_)) => {
                Ok(Self::from_text(&n.to_text().unwrap_or_default()))
            }
            Value::Array(c) => Self::from_collection(c),
            other => {
                debug!(input_type = other.type_name(), "character sequence rejected input");
                Err(CollectionError::invalid_input(
                    TARGET,
                    format!("expected a string, got {}", other.type_name()),
                ))
            }
        }
    }

    /// Split `text` into Unicode scalar values.
    pub fn from_text(text: &str) -> Self {
        Self {
            inner: Collection::from_values(text.chars()),
        }
    }

    /// The characters joined back into a string.
    pub fn text(&self) -> String {
        self.inner
            .iter()
            .filter_map(|(_, v)| v.as_str())
            .collect()
    }

    /// Transform each character and re-join the results into a new
    /// sequence.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` if a result has no text form.
    pub fn map(
        &self,
        f: impl FnMut(&Value, &Key, usize) -> Value,
    ) -> Result<CharSequence, CollectionError> {
        let text = self.inner.map(f).join("")?;
        Ok(Self::from_text(&text))
    }

    /// A new sequence with `text` appended.
    pub fn push(&self, text: &str) -> CharSequence {
        Self::from_text(&(self.text() + text))
    }

    /// A new sequence with `text` prepended.
    pub fn unshift(&self, text: &str) -> CharSequence {
        Self::from_text(&format!("{}{}", text, self.text()))
    }
}

impl Deref for CharSequence {
    type Target = Collection;

    fn deref(&self) -> &Collection {
        &self.inner
    }
}

impl Variant for CharSequence {
    const KIND: Kind = Kind::Characters;

    fn from_collection(collection: Collection) -> Result<Self, CollectionError> {
        let single_char = |v: &Value| v.as_str().is_some_and(|s| s.chars().count() == 1);
        if let Some((key, value)) = collection.iter().find(|(_, v)| !single_char(v)) {
            debug!(%key, value = %value, "character sequence rejected element");
            return Err(CollectionError::invalid_input(
                TARGET,
                format!("element at {} is not a single character", key),
            ));
        }
        Ok(Self {
            inner: collection.values(),
        })
    }

    fn into_collection(self) -> Collection {
        self.inner
    }
}
