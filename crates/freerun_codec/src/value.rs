//! Dynamic document value type.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A node of a decoded document tree.
///
/// Maps keep their entries in insertion order; the binary format does not
/// sort keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Keyed container.
    Map(Vec<(String, Value)>),
    /// Ordered container.
    Array(Vec<Value>),
    /// Text string (UTF-8).
    Text(String),
    /// 32-bit signed integer.
    Int(i32),
    /// 32-bit float.
    Float(f32),
}

impl Value {
    /// Returns the number of nodes in this subtree, including itself.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Value::Map(entries) => {
                1 + entries
                    .iter()
                    .map(|(_, v)| v.node_count())
                    .sum::<usize>()
            }
            Value::Array(items) => 1 + items.iter().map(Value::node_count).sum::<usize>(),
            _ => 1,
        }
    }

    /// Get this value as a string, if it is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float, if it is one.
    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get this value as an array, if it is one.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get this value as a map, if it is one.
    #[must_use]
    pub fn as_map(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a key in this map value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Array(items) => serializer.collect_seq(items),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Int(n) => serializer.serialize_i32(*n),
            Value::Float(f) => serializer.serialize_f32(*f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        Value::Map(vec![
            ("name".to_string(), Value::from("run")),
            ("frames".to_string(), Value::from(vec![1, 2, 3])),
        ])
    }

    #[test]
    fn map_get() {
        let map = sample();
        assert_eq!(map.get("name"), Some(&Value::Text("run".to_string())));
        assert_eq!(map.get("missing"), None);
        assert_eq!(Value::Int(1).get("name"), None);
    }

    #[test]
    fn value_accessors() {
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Float(0.5).as_float(), Some(0.5));
        assert_eq!(Value::Text("x".to_string()).as_text(), Some("x"));
        assert_eq!(Value::Int(1).as_text(), None);
        assert_eq!(
            sample()
                .get("frames")
                .and_then(Value::as_array)
                .map(<[_]>::len),
            Some(3)
        );
    }

    #[test]
    fn node_count_includes_containers() {
        // map + text + array + 3 ints
        assert_eq!(sample().node_count(), 6);
    }

    #[test]
    fn serializes_as_json_object() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"name":"run","frames":[1,2,3]}"#);
    }
}
