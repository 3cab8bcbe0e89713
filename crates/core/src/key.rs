//! # Keys
//!
//! Every entry in a collection is addressed by a `Key`, which is either an
//! integer or a string. String keys that spell a canonical decimal integer
//! are normalized to integers on construction, so `"8"` and `8` name the
//! same entry. `"08"`, `"+8"` and `"8.0"` stay strings.

use std::fmt;

use serde::{Serialize, Serializer};

/// A collection key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Integer key (also produced by canonical integer strings).
    Int(i64),
    /// Any other string key.
    Str(String),
}

impl Key {
    /// Build a key from text, applying integer normalization.
    pub fn parse(text: &str) -> Self {
        match canonical_int(text) {
            Some(i) => Key::Int(i),
            None => Key::Str(text.to_string()),
        }
    }

    /// The integer value, if this is an integer key.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            Key::Str(_) => None,
        }
    }

    /// The string value, if this is a string key.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Int(_) => None,
            Key::Str(s) => Some(s),
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Key::Int(_))
    }
}

/// Parse `text` as a canonical decimal integer: no leading zeros (except a
/// lone `0`), no `+` sign, no `-0`, and within `i64` range.
fn canonical_int(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    if text == "-0" {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{}", i),
            Key::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::parse(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        match canonical_int(&s) {
            Some(i) => Key::Int(i),
            None => Key::Str(s),
        }
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::parse(s)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Int(i64::from(i))
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Int(i as i64)
    }
}

impl From<&Key> for Key {
    fn from(k: &Key) -> Self {
        k.clone()
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Key::Int(i) => serializer.serialize_i64(*i),
            Key::Str(s) => serializer.serialize_str(s),
        }
    }
}
