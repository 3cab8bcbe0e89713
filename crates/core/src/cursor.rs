//! Stateful iteration.
//!
//! A `Cursor` walks a collection in insertion order with an explicit
//! position, mirroring the `current / key / next / rewind / valid` protocol.
//! It also implements `Iterator`, so `for (key, value) in coll.cursor()`
//! works as expected.

use crate::collection::Collection;
use crate::key::Key;
use crate::value::Value;

/// Positioned iterator over a borrowed collection.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    collection: &'a Collection,
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(collection: &'a Collection) -> Self {
        Cursor {
            collection,
            position: 0,
        }
    }

    /// Value at the cursor, or `None` once exhausted.
    pub fn current(&self) -> Option<&'a Value> {
        self.collection.entry_at(self.position).map(|(_, v)| v)
    }

    /// Key at the cursor, or `None` once exhausted.
    pub fn key(&self) -> Option<&'a Key> {
        self.collection.entry_at(self.position).map(|(k, _)| k)
    }

    /// Move forward and return the new current value.
    pub fn advance(&mut self) -> Option<&'a Value> {
        if self.position < self.collection.count() {
            self.position += 1;
        }
        self.current()
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    pub fn valid(&self) -> bool {
        self.position < self.collection.count()
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = (&'a Key, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.collection.entry_at(self.position)?;
        self.position += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.collection.count().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Cursor<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_protocol() {
        let coll = Collection::from_values(["a", "b"]);
        let mut cursor = coll.cursor();
        assert!(cursor.valid());
        assert_eq!(cursor.key(), Some(&Key::Int(0)));
        assert_eq!(cursor.advance(), Some(&Value::from("b")));
        assert_eq!(cursor.advance(), None);
        assert!(!cursor.valid());
        assert_eq!(cursor.advance(), None);
        cursor.rewind();
        assert_eq!(cursor.current(), Some(&Value::from("a")));
    }

    #[test]
    fn test_cursor_iterates_in_order() {
        let coll: Collection = [("x", 1), ("y", 2)].into_iter().collect();
        let keys: Vec<String> = coll.cursor().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["x", "y"]);
        assert_eq!(coll.cursor().len(), 2);
    }

    #[test]
    fn test_empty_cursor() {
        let coll = Collection::new();
        let mut cursor = coll.cursor();
        assert!(!cursor.valid());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.next(), None);
    }
}
