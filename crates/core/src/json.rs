//! Conversions between collections and `serde_json` documents.
//!
//! List-shaped collections (keys `0..n` in order) serialize as sequences and
//! everything else as maps. Objects serialize as their property maps. In the
//! other direction, JSON arrays become list-shaped collections and JSON
//! objects become keyed collections (not `Object`s).

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Number as JsonNumber, Value as Json};

use crate::collection::Collection;
use crate::key::Key;
use crate::value::Value;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Array(c) => c.serialize(serializer),
            Value::Object(o) => {
                let mut map = serializer.serialize_map(None)?;
                for (name, v) in o.properties() {
                    map.serialize_entry(name, v)?;
                }
                map.end()
            }
        }
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_list() {
            let mut seq = serializer.serialize_seq(Some(self.count()))?;
            for (_, v) in self {
                seq.serialize_element(v)?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(self.count()))?;
            for (k, v) in self {
                map.serialize_entry(k, v)?;
            }
            map.end()
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Json::deserialize(deserializer).map(Value::from)
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::Array(Collection::from_values(items)),
            Json::Object(map) => Value::Array(
                map.into_iter()
                    .map(|(k, v)| (Key::from(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for Json {
    /// Non-finite floats become `null`.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => JsonNumber::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::Str(s) => Json::String(s.clone()),
            Value::Array(c) => c.to_json(),
            Value::Object(o) => Json::Object(
                o.properties()
                    .map(|(name, v)| (name.to_string(), Json::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Collection {
    /// The collection as a JSON document.
    pub fn to_json(&self) -> Json {
        if self.is_list() {
            Json::Array(self.iter().map(|(_, v)| Json::from(v)).collect())
        } else {
            Json::Object(
                self.iter()
                    .map(|(k, v)| (k.to_string(), Json::from(v)))
                    .collect::<Map<String, Json>>(),
            )
        }
    }
}
