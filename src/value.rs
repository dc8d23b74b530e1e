//! The value side of the settings engine.
//!
//! A [`Value`] is what actually gets stored in a [`Settings`](crate::settings::Settings)
//! tree. The external world talks JSON-compatible documents ([`Document`]);
//! schema parsers turn documents into values and generators turn them back.
//! Unit *semantics* are out of scope here: a [`Value::Quantity`] is an opaque
//! magnitude and unit string, nothing more.

// used to print out readable forms of a value
use std::fmt;

use serde::ser::{Serialize, Serializer};

use crate::settings::Settings;

/// The external, loosely-typed document representation. An ordered,
/// string-keyed JSON value (`serde_json` with `preserve_order`).
pub type Document = serde_json::Value;

/// An ordered string-keyed document mapping.
pub type DocumentMap = serde_json::Map<String, Document>;

// ------------- Value -------------
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
    /// A magnitude with an opaque unit string, e.g. `50.0` and `"keV"`.
    Quantity(f64, String),
    Seq(Vec<Value>),
    Section(Settings),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Real(_) => "real",
            Value::Str(_) => "string",
            Value::Quantity(_, _) => "quantity",
            Value::Seq(_) => "sequence",
            Value::Section(_) => "section",
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
    /// Numeric magnitude of an `Int` or `Real`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_section(&self) -> Option<&Settings> {
        match self {
            Value::Section(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a document into a value without consulting any schema.
    /// Objects become unbound sections, numbers become `Int` when they fit.
    pub fn from_document(doc: &Document) -> Value {
        match doc {
            Document::Null => Value::Null,
            Document::Bool(b) => Value::Bool(*b),
            Document::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            Document::String(s) => Value::Str(s.clone()),
            Document::Array(items) => {
                Value::Seq(items.iter().map(Value::from_document).collect())
            }
            Document::Object(map) => {
                let mut section = Settings::new();
                for (k, v) in map {
                    section.insert(k.clone(), Value::from_document(v));
                }
                Value::Section(section)
            }
        }
    }

    /// Converts a value into a document without consulting any schema.
    /// The inverse of [`Value::from_document`]; quantities render as
    /// `"<magnitude> <unit>"` strings.
    pub fn to_document(&self) -> Document {
        match self {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Bool(*b),
            Value::Int(i) => Document::from(*i),
            Value::Real(r) => match serde_json::Number::from_f64(*r) {
                Some(n) => Document::Number(n),
                None => Document::String(r.to_string()),
            },
            Value::Str(s) => Document::String(s.clone()),
            Value::Quantity(magnitude, unit) => {
                Document::String(format!("{} {}", magnitude, unit))
            }
            Value::Seq(items) => {
                Document::Array(items.iter().map(Value::to_document).collect())
            }
            Value::Section(section) => {
                let mut map = DocumentMap::new();
                for (k, v) in section.iter() {
                    map.insert(k.to_string(), v.to_document());
                }
                Document::Object(map)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Str(s) => write!(f, "{}", s),
            Value::Quantity(magnitude, unit) => write!(f, "{} {}", magnitude, unit),
            Value::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Section(section) => write!(f, "{}", section),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Int(v)
    }
}
impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value::Int(v as i64)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Real(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::Str(v.to_string())
    }
}
impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::Str(v)
    }
}
impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Value {
        Value::Seq(v)
    }
}
impl From<Settings> for Value {
    fn from(v: Settings) -> Value {
        Value::Section(v)
    }
}
