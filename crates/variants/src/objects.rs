//! # Object Sets
//!
//! A collection whose every value is an `Object`, optionally restricted to
//! one declared class. Objects have no text form, so `join` is not
//! available.

use std::ops::Deref;

use shaped_core::{Collection, CollectionError, Key, Kind, Object, Value};
use tracing::debug;

use crate::Variant;

const TARGET: &str = "ObjectSet";

/// A collection of objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSet {
    inner: Collection,
    class: Option<String>,
}

impl ObjectSet {
    /// Build a set of objects of any class.
    pub fn new(data: impl Into<Value>) -> Result<Self, CollectionError> {
        Self::from_collection(Collection::try_from(data.into())?)
    }

    /// Build a set whose objects must all be of `class`.
    pub fn with_type(
        data: impl Into<Value>,
        class: impl Into<String>,
    ) -> Result<Self, CollectionError> {
        let set = Self {
            inner: Collection::new(),
            class: Some(class.into()),
        };
        let inner = Collection::try_from(data.into())?;
        for (_, value) in inner.iter() {
            set.check(value)?;
        }
        Ok(Self { inner, ..set })
    }

    /// The required class, if one was declared.
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    fn check(&self, value: &Value) -> Result<(), CollectionError> {
        let Some(object) = value.as_object() else {
            debug!(value_type = value.type_name(), "object set rejected non-object");
            return Err(CollectionError::invalid_input(
                TARGET,
                format!("expected an object, got {}", value.type_name()),
            ));
        };
        match &self.class {
            Some(class) if !object.is_instance_of(class) => {
                debug!(expected = %class, actual = object.class(), "object set rejected class");
                Err(CollectionError::invalid_input(
                    TARGET,
                    format!("expected an instance of {}, got {}", class, object.class()),
                ))
            }
            _ => Ok(()),
        }
    }

    fn with_inner(&self, inner: Collection) -> Self {
        Self {
            inner,
            class: self.class.clone(),
        }
    }

    pub fn set(
        &self,
        key: impl Into<Key>,
        value: impl Into<Value>,
    ) -> Result<Self, CollectionError> {
        let value = value.into();
        self.check(&value)?;
        Ok(self.with_inner(self.inner.set(key, value)))
    }

    pub fn add(
        &self,
        key: impl Into<Key>,
        value: impl Into<Value>,
    ) -> Result<Self, CollectionError> {
        let value = value.into();
        self.check(&value)?;
        Ok(self.with_inner(self.inner.add(key, value)))
    }

    pub fn append(&self, value: impl Into<Value>) -> Result<Self, CollectionError> {
        let value = value.into();
        self.check(&value)?;
        Ok(self.with_inner(self.inner.append(value)?))
    }

    pub fn prepend(&self, value: impl Into<Value>) -> Result<Self, CollectionError> {
        let value = value.into();
        self.check(&value)?;
        Ok(self.with_inner(self.inner.prepend(value)))
    }

    /// Append copies of `fill` until the set holds `size` objects. Each new
    /// slot gets its own duplicate, so no two slots share an identity.
    pub fn pad(&self, size: usize, fill: &Object) -> Result<Self, CollectionError> {
        self.check(&Value::from(fill.clone()))?;
        let mut inner = self.inner.clone();
        while inner.count() < size {
            inner = inner.append(fill.duplicate())?;
        }
        Ok(self.with_inner(inner))
    }

    /// Objects cannot be joined into a string.
    pub fn join(&self, _glue: &str) -> Result<String, CollectionError> {
        Err(CollectionError::InvalidOperation {
            reason: "objects cannot be joined into a string".to_string(),
        })
    }

    /// The objects, in order.
    pub fn objects(&self) -> impl Iterator<Item = &Object> + '_ {
        self.inner.iter().filter_map(|(_, v)| v.as_object())
    }
}

impl Deref for ObjectSet {
    type Target = Collection;

    fn deref(&self) -> &Collection {
        &self.inner
    }
}

impl Variant for ObjectSet {
    const KIND: Kind = Kind::Objects;

    fn from_collection(collection: Collection) -> Result<Self, CollectionError> {
        let set = Self::default();
        for (_, value) in collection.iter() {
            set.check(value)?;
        }
        Ok(set.with_inner(collection))
    }

    fn into_collection(self) -> Collection {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> Object {
        Object::new("User").with_property("name", name)
    }

    #[test]
    fn test_typed_set_rejects_other_classes() {
        let set = ObjectSet::with_type(Value::from(vec![user("luke")]), "User").unwrap();
        assert_eq!(set.class(), Some("User"));
        assert!(set.append(Object::new("Robot")).is_err());
        assert!(set.append(user("leia")).is_ok());
    }

    #[test]
    fn test_pad_duplicates_fill() {
        let fill = user("anon");
        let set = ObjectSet::new(Value::from(vec![user("luke")]))
            .unwrap()
            .pad(3, &fill)
            .unwrap();
        let objects: Vec<&Object> = set.objects().collect();
        assert_eq!(objects.len(), 3);
        assert!(!Object::same(objects[1], objects[2]));
        assert!(!Object::same(objects[1], &fill));
        assert_eq!(objects[1], &fill);
    }

    #[test]
    fn test_join_fails() {
        let set = ObjectSet::new(Value::from(vec![user("luke")])).unwrap();
        assert!(matches!(
            set.join(","),
            Err(CollectionError::InvalidOperation { .. })
        ));
    }
}
