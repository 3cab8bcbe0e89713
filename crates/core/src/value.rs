//! # Values
//!
//! A `Value` is anything a collection can hold: scalars, nested arrays
//! (themselves `Collection`s) and reference-typed objects.
//!
//! Two notions of equality coexist:
//!
//! - `PartialEq` is strict and structural: `Int(1) != Float(1.0)`, and arrays
//!   compare in order.
//! - [`Value::loose_eq`] is the equality used by value *searches*. Numbers
//!   compare numerically across integers, floats and numeric strings, `Null`
//!   matches empty things, and arrays compare as key/value sets.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::collection::Collection;
use crate::key::Key;

/// A value stored in a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A nested collection.
    Array(Collection),
    /// A reference-typed object.
    Object(Object),
}

impl Value {
    /// Short name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Bools, numbers and strings.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_)
        )
    }

    /// Only arrays can be traversed; objects are opaque.
    pub fn is_traversable(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Integers, floats and numeric strings.
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Int(_) | Value::Float(_) => true,
            Value::Str(s) => is_numeric_str(s),
            _ => false,
        }
    }

    /// Truthiness: `null`, `false`, `0`, `0.0`, `""`, `"0"` and empty arrays
    /// are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !(s.is_empty() || s == "0"),
            Value::Array(c) => !c.is_empty(),
            Value::Object(_) => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Array(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// The numeric reading of this value, if it is numeric.
    pub fn as_number(&self) -> Option<Number> {
        Number::from_value(self)
    }

    pub fn into_collection(self) -> Option<Collection> {
        match self {
            Value::Array(c) => Some(c),
            _ => None,
        }
    }

    /// Canonical text form of a scalar. Arrays and objects have none.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => Some(String::new()),
            Value::Bool(true) => Some("1".to_string()),
            Value::Bool(false) => Some(String::new()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(format_float(*f)),
            Value::Str(s) => Some(s.clone()),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// The key under which this value is tallied by `frequency`,
    /// `duplicates` and `counts`.
    ///
    /// Scalars use their text form (so `1`, `1.0` and `"1"` share a key).
    /// Arrays use their rendering; objects use class plus identity.
    pub fn to_key(&self) -> Key {
        match self {
            Value::Array(_) => Key::Str(self.to_string()),
            Value::Object(o) => Key::Str(format!("{}#{:x}", o.class(), o.identity())),
            scalar => Key::from(scalar.to_text().unwrap_or_default()),
        }
    }

    /// Equality used by value searches. See the module docs.
    pub fn loose_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(b), v) | (v, Bool(b)) => *b == v.is_truthy(),
            (Null, Str(s)) | (Str(s), Null) => s.is_empty(),
            (Null, v) | (v, Null) => !v.is_truthy(),
            (Str(a), Str(b)) => match (Number::parse(a), Number::parse(b)) {
                (Some(x), Some(y)) => x.numeric_eq(y),
                _ => a == b,
            },
            (Str(s), n @ (Int(_) | Float(_))) | (n @ (Int(_) | Float(_)), Str(s)) => {
                match (Number::parse(s), Number::from_value(n)) {
                    (Some(x), Some(y)) => x.numeric_eq(y),
                    _ => n.to_text().as_deref() == Some(s.as_str()),
                }
            }
            (Int(a), Int(b)) => a == b,
            (Int(_) | Float(_), Int(_) | Float(_)) => {
                match (Number::from_value(self), Number::from_value(other)) {
                    (Some(x), Some(y)) => x.numeric_eq(y),
                    _ => false,
                }
            }
            (Array(a), Array(b)) => {
                a.count() == b.count()
                    && a.iter().all(|(k, v)| {
                        b.as_map().get(k).map_or(false, |w| v.loose_eq(w))
                    })
            }
            (Object(a), Object(b)) => {
                self::Object::same(a, b)
                    || (a.class() == b.class()
                        && a.0.properties.len() == b.0.properties.len()
                        && a.properties().all(|(name, v)| {
                            b.property(name).map_or(false, |w| v.loose_eq(w))
                        }))
            }
            _ => false,
        }
    }
}

/// Numeric-literal test for strings: optional surrounding whitespace,
/// optional sign, digits with an optional fraction (or a bare fraction),
/// optional exponent. `inf`, `nan` and hex are rejected.
pub fn is_numeric_str(s: &str) -> bool {
    let t = s.trim_matches(|c: char| c.is_ascii_whitespace());
    let bytes = t.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;
    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }
    if int_digits == 0 && frac_digits == 0 {
        return false;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

/// Integral floats print without a fraction (`2.0` → `"2"`).
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NAN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "INF" } else { "-INF" };
        text.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Str(s) => write!(f, "{}", s),
            Value::Array(c) => write!(f, "{}", c),
            Value::Object(o) => {
                write!(f, "{} {{", o.class())?;
                for (i, (name, v)) in o.properties().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

// ============================================================================
// Numbers
// ============================================================================

/// The numeric reading of a value; result type of numeric statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Parse a numeric string. Strings without fraction or exponent that fit
    /// in `i64` become `Int`.
    pub fn parse(s: &str) -> Option<Number> {
        if !is_numeric_str(s) {
            return None;
        }
        let t = s.trim_matches(|c: char| c.is_ascii_whitespace());
        if !t.contains(['.', 'e', 'E']) {
            if let Ok(i) = t.parse::<i64>() {
                return Some(Number::Int(i));
            }
        }
        t.parse::<f64>().ok().map(Number::Float)
    }

    /// Numeric reading of a value: numbers as-is, numeric strings parsed.
    pub fn from_value(value: &Value) -> Option<Number> {
        match value {
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::Str(s) => Number::parse(s),
            _ => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    /// Addition that stays integral until it would overflow.
    pub fn add(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_add(b) {
                Some(sum) => Number::Int(sum),
                None => Number::Float(a as f64 + b as f64),
            },
            (a, b) => Number::Float(a.as_f64() + b.as_f64()),
        }
    }

    pub fn sub(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => match a.checked_sub(b) {
                Some(diff) => Number::Int(diff),
                None => Number::Float(a as f64 - b as f64),
            },
            (a, b) => Number::Float(a.as_f64() - b.as_f64()),
        }
    }

    /// Equality across representations (`Int(2)` equals `Float(2.0)`).
    pub fn numeric_eq(self, other: Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }

    /// Total numeric ordering (NaN sorts last).
    pub fn total_cmp(self, other: Number) -> std::cmp::Ordering {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(&b),
            (a, b) => a.as_f64().total_cmp(&b.as_f64()),
        }
    }
}

impl PartialEq<i64> for Number {
    fn eq(&self, other: &i64) -> bool {
        self.numeric_eq(Number::Int(*other))
    }
}

impl PartialEq<f64> for Number {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == *other
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => write!(f, "{}", format_float(*x)),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Number::Int(i64::from(i))
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Value::Int(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

// ============================================================================
// Objects
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct ObjectData {
    class: String,
    properties: IndexMap<String, Value>,
}

/// A reference-typed value: a class name plus ordered properties.
///
/// Cloning an `Object` shares the reference, like handing an object around
/// in a garbage-collected language. [`Object::duplicate`] makes a new
/// identity with the same properties.
///
/// ```rust
/// use shaped_core::Object;
///
/// let user = Object::new("User").with_property("name", "luke");
/// let alias = user.clone();
/// let copy = user.duplicate();
///
/// assert!(Object::same(&user, &alias));
/// assert!(!Object::same(&user, &copy));
/// assert_eq!(user, copy);
/// ```
#[derive(Clone)]
pub struct Object(Arc<ObjectData>);

impl Object {
    pub fn new(class: impl Into<String>) -> Self {
        Object(Arc::new(ObjectData {
            class: class.into(),
            properties: IndexMap::new(),
        }))
    }

    /// Build an object from `(name, value)` pairs.
    pub fn with_properties<K, V, I>(class: impl Into<String>, properties: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Object(Arc::new(ObjectData {
            class: class.into(),
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }))
    }

    /// Builder-style property setter. Copies the data first if the object is
    /// already shared.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.0)
            .properties
            .insert(name.into(), value.into());
        self
    }

    pub fn class(&self) -> &str {
        &self.0.class
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.0.properties.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Class test used by typed object sets.
    pub fn is_instance_of(&self, class: &str) -> bool {
        self.0.class == class
    }

    /// Identity comparison.
    pub fn same(a: &Object, b: &Object) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// A new object with the same class and properties but its own identity.
    pub fn duplicate(&self) -> Object {
        Object(Arc::new((*self.0).clone()))
    }

    /// Stable identity of the underlying allocation.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        Object::same(self, other) || self.0 == other.0
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.0.class)
            .field("properties", &self.0.properties)
            .finish()
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Str(c.to_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<Key> for Value {
    fn from(k: Key) -> Self {
        match k {
            Key::Int(i) => Value::Int(i),
            Key::Str(s) => Value::Str(s),
        }
    }
}

impl From<&Key> for Value {
    fn from(k: &Key) -> Self {
        Value::from(k.clone())
    }
}

impl From<Collection> for Value {
    fn from(c: Collection) -> Self {
        Value::Array(c)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(o: Option<T>) -> Self {
        o.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(Collection::from_values(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strings() {
        for s in ["1", "-1", "+1.5", ".5", "5.", "1e3", "1E-3", " 42", "42 ", "0"] {
            assert!(is_numeric_str(s), "{s:?} should be numeric");
        }
        for s in ["", "abc", "1a", "inf", "NaN", "0x1A", "1e", ".", "-", "1 2"] {
            assert!(!is_numeric_str(s), "{s:?} should not be numeric");
        }
    }

    #[test]
    fn test_bools_are_not_numeric() {
        assert!(!Value::Bool(true).is_numeric());
        assert!(!Value::Null.is_numeric());
    }

    #[test]
    fn test_number_parse() {
        assert_eq!(Number::parse("12"), Some(Number::Int(12)));
        assert_eq!(Number::parse("1.5"), Some(Number::Float(1.5)));
        assert_eq!(Number::parse("1e2"), Some(Number::Float(100.0)));
        assert_eq!(Number::parse("x"), None);
    }

    #[test]
    fn test_number_add_promotes_on_overflow() {
        assert_eq!(Number::Int(2).add(Number::Int(3)), Number::Int(5));
        assert!(matches!(
            Number::Int(i64::MAX).add(Number::Int(1)),
            Number::Float(_)
        ));
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::from("0").is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("00").is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(Value::Object(Object::new("X")).is_truthy());
    }

    #[test]
    fn test_loose_eq_numbers_and_strings() {
        assert!(Value::from(1).loose_eq(&Value::from("1")));
        assert!(Value::from(1).loose_eq(&Value::from(1.0)));
        assert!(Value::from("1e1").loose_eq(&Value::from("10")));
        assert!(!Value::from("abc").loose_eq(&Value::from("ABC")));
        assert!(!Value::from(0).loose_eq(&Value::from("a")));
    }

    #[test]
    fn test_loose_eq_null_and_bool() {
        assert!(Value::Null.loose_eq(&Value::from(0)));
        assert!(Value::Null.loose_eq(&Value::from("")));
        assert!(!Value::Null.loose_eq(&Value::from("0")));
        assert!(Value::from(true).loose_eq(&Value::from("yes")));
        assert!(Value::from(false).loose_eq(&Value::from(0)));
    }

    #[test]
    fn test_text_forms() {
        assert_eq!(Value::from(2.0).to_text().as_deref(), Some("2"));
        assert_eq!(Value::from(2.5).to_text().as_deref(), Some("2.5"));
        assert_eq!(Value::from(true).to_text().as_deref(), Some("1"));
        assert_eq!(Value::Null.to_text().as_deref(), Some(""));
        assert_eq!(Value::from(Object::new("X")).to_text(), None);
    }

    #[test]
    fn test_object_identity_and_duplicate() {
        let a = Object::new("Point").with_property("x", 1);
        let b = a.clone();
        let c = a.duplicate();
        assert!(Object::same(&a, &b));
        assert!(!Object::same(&a, &c));
        assert_eq!(a, c);
        assert!(Value::from(a).loose_eq(&Value::from(c)));
    }

    #[test]
    fn test_loose_eq_objects() {
        let point = |class: &str, x: Value| Value::from(Object::new(class).with_property("x", x));
        let a = point("Point", Value::Int(1));
        assert!(a.loose_eq(&a.clone()));
        assert!(a.loose_eq(&point("Point", Value::from("1"))));
        assert!(!a.loose_eq(&point("Point", Value::Int(2))));
        assert!(!a.loose_eq(&point("Line", Value::Int(1))));
    }
}
