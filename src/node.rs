//! Input tree for the renderer. No `serde_json::Value` past this boundary.
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum DocumentNode {
    Scalar(Scalar),
    List(Vec<DocumentNode>),          // schema order = render order
    Record(IndexMap<String, DocumentNode>), // source key order preserved
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTION
// ————————————————————————————————————————————————————————————————————————————

impl DocumentNode {
    pub fn as_record(&self) -> Option<&IndexMap<String, DocumentNode>> {
        match self {
            Self::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Back to JSON, used for the compact stringification fallback.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Scalar(s) => s.to_value(),
            Self::List(items) => Value::Array(items.iter().map(Self::to_value).collect()),
            Self::Record(fields) => Value::Object(
                fields.iter().map(|(k, v)| (k.clone(), v.to_value())).collect()
            ),
        }
    }
}

impl Scalar {
    fn to_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
        }
    }
}

impl From<Value> for DocumentNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            Value::String(s) => Self::Scalar(Scalar::String(s)),
            Value::Array(xs) => Self::List(xs.into_iter().map(Self::from).collect()),
            Value::Object(m) => Self::Record(
                m.into_iter().map(|(k, v)| (k, Self::from(v))).collect()
            ),
        }
    }
}

impl From<&Value> for DocumentNode {
    fn from(value: &Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<DocumentNode> for Value {
    fn from(node: DocumentNode) -> Self {
        node.to_value()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// STRINGIFICATION
// ————————————————————————————————————————————————————————————————————————————

/// Direct stringification: scalars as text (null → ""), containers as compact JSON.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for DocumentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{s}"),
            Self::List(_) | Self::Record(_) => write!(f, "{}", self.to_value()),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_keys_keep_source_order() {
        let src = r#"{"zeta": 1, "alpha": 2, "mid": 3}"#;
        let node: DocumentNode = serde_json::from_str(src).unwrap();
        let keys: Vec<&str> = node.as_record().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn containers_stringify_as_compact_json() {
        let node = DocumentNode::from(json!({"a": [1, "x", null]}));
        assert_eq!(node.to_string(), r#"{"a":[1,"x",null]}"#);
        assert_eq!(DocumentNode::from(Value::Null).to_string(), "");
        assert_eq!(DocumentNode::from(json!(false)).to_string(), "false");
        assert_eq!(DocumentNode::from(json!(2.5)).to_string(), "2.5");
    }

    #[test]
    fn value_conversion_is_lossless() {
        let v = json!({"b": {"c": [true, 0, "n/a"]}, "a": null});
        assert_eq!(Value::from(DocumentNode::from(&v)), v);
    }
}
