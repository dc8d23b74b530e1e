//! Stock converters for the document boundary.
//!
//! Scientific settings files write quantities as `"50 keV"` and quantity
//! sequences as `"[1, 2, 3] mm"`. The parsers here turn those strings into
//! [`Value::Quantity`] values and the generators format them back, so a
//! schema author can plug them straight into
//! [`Type::with_parser`](crate::schema::Type::with_parser) and
//! [`Type::with_generator`](crate::schema::Type::with_generator).
//! What a unit string *means* is an external unit registry's business.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, TareError};
use crate::predicate::has_unit;
use crate::schema::Type;
use crate::value::{Document, Value};

lazy_static! {
    // e.g. "10.5 eV", "-3e-2 m"
    static ref QUANTITY: Regex =
        Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)\s+(\S+)\s*$").unwrap();
    // e.g. "[1, 2.5, 3] mm"
    static ref QUANTITY_SEQ: Regex =
        Regex::new(r"^\s*\[\s*([^\]]*?)\s*\]\s+(\S+)\s*$").unwrap();
}

fn parse_error(message: String) -> TareError {
    // the enclosing transform pass fills in the dotted path
    TareError::Parse {
        path: String::new(),
        message,
    }
}

/// Parses a `"<magnitude> <unit>"` document string into a quantity.
pub fn parse_quantity(doc: &Document) -> Result<Value> {
    let text = match doc {
        Document::String(s) => s,
        other => return Err(parse_error(format!("expected a quantity string, got {}", other))),
    };
    let captures = QUANTITY
        .captures(text)
        .ok_or_else(|| parse_error(format!("`{}` is not of the form `<number> <unit>`", text)))?;
    let magnitude: f64 = captures[1]
        .parse()
        .map_err(|_| parse_error(format!("`{}` has no parsable magnitude", text)))?;
    Ok(Value::Quantity(magnitude, String::from(&captures[2])))
}

/// Formats a quantity back into its `"<magnitude> <unit>"` document string.
/// Non-quantities fall back to the schemaless conversion.
pub fn format_quantity(value: &Value) -> Document {
    match value {
        Value::Quantity(magnitude, unit) => Document::String(format!("{} {}", magnitude, unit)),
        other => other.to_document(),
    }
}

/// Parses a `"[<n>, <n>, ...] <unit>"` document string into a sequence of
/// quantities sharing one unit.
pub fn parse_quantity_seq(doc: &Document) -> Result<Value> {
    let text = match doc {
        Document::String(s) => s,
        other => return Err(parse_error(format!("expected a quantity sequence string, got {}", other))),
    };
    let captures = QUANTITY_SEQ.captures(text).ok_or_else(|| {
        parse_error(format!("`{}` is not of the form `[<numbers>] <unit>`", text))
    })?;
    let unit = String::from(&captures[2]);
    let mut items = Vec::new();
    for entry in captures[1].split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let magnitude: f64 = entry
            .parse()
            .map_err(|_| parse_error(format!("`{}` is not a number in `{}`", entry, text)))?;
        items.push(Value::Quantity(magnitude, unit.clone()));
    }
    Ok(Value::Seq(items))
}

/// Formats a sequence of same-unit quantities as `"[<n>, <n>, ...] <unit>"`.
/// Anything else falls back to the schemaless conversion.
pub fn format_quantity_seq(value: &Value) -> Document {
    if let Value::Seq(items) = value {
        let mut unit = None;
        let mut magnitudes = Vec::new();
        for item in items {
            match item {
                Value::Quantity(magnitude, u) if unit.is_none() || unit == Some(u) => {
                    unit = Some(u);
                    magnitudes.push(magnitude.to_string());
                }
                _ => return value.to_document(),
            }
        }
        if let Some(unit) = unit {
            return Document::String(format!("[{}] {}", magnitudes.join(", "), unit));
        }
    }
    value.to_document()
}

/// A leaf type for a quantity carrying the given unit string, wired to the
/// quantity parser and generator.
pub fn quantity_type(description: &str, unit: &str) -> Type {
    Type::new(description)
        .with_check(has_unit(unit))
        .with_parser(parse_quantity)
        .with_generator(format_quantity)
}
