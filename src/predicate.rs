//! Composable, named boolean tests over [`Value`]s.
//!
//! A [`Predicate`] wraps a total function `&Value -> bool` together with a
//! description string used in error messages and schema documentation.
//! Predicates compose with [`and`](Predicate::and), [`or`](Predicate::or) and
//! [`not`](Predicate::not), or with the `&`, `|` and `!` operators; the
//! description of a composed predicate is the textual composition of its
//! operands (`"A & B"`, `"A | B"`, `"!A"`).
//!
//! The stock predicates at the bottom of this module cover the usual scalar
//! checks. Anything involving physical dimensions beyond a literal unit
//! string is the business of an external unit registry, not of this crate.

use std::fmt;
use std::ops;
use std::path::Path;
use std::sync::Arc;

use crate::value::Value;

type Test = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

// ------------- Predicate -------------
#[derive(Clone)]
pub struct Predicate {
    test: Test,
    description: String,
}

impl Predicate {
    pub fn new<F>(description: &str, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Arc::new(test),
            description: String::from(description),
        }
    }
    pub fn test(&self, value: &Value) -> bool {
        (self.test)(value)
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    /// Conjunction, described as `"A & B"`.
    pub fn and(&self, other: &Predicate) -> Predicate {
        let (a, b) = (Arc::clone(&self.test), Arc::clone(&other.test));
        Predicate {
            test: Arc::new(move |v| a(v) && b(v)),
            description: format!("{} & {}", self.description, other.description),
        }
    }
    /// Disjunction, described as `"A | B"`.
    pub fn or(&self, other: &Predicate) -> Predicate {
        let (a, b) = (Arc::clone(&self.test), Arc::clone(&other.test));
        Predicate {
            test: Arc::new(move |v| a(v) || b(v)),
            description: format!("{} | {}", self.description, other.description),
        }
    }
    /// Negation, described as `"!A"`.
    pub fn not(&self) -> Predicate {
        let a = Arc::clone(&self.test);
        Predicate {
            test: Arc::new(move |v| !a(v)),
            description: format!("!{}", self.description),
        }
    }
}

impl ops::BitAnd for Predicate {
    type Output = Predicate;
    fn bitand(self, other: Predicate) -> Predicate {
        self.and(&other)
    }
}
impl ops::BitOr for Predicate {
    type Output = Predicate;
    fn bitor(self, other: Predicate) -> Predicate {
        self.or(&other)
    }
}
impl ops::Not for Predicate {
    type Output = Predicate;
    fn not(self) -> Predicate {
        Predicate::not(&self)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Predicate <{}>", self.description)
    }
}

// ------------- Stock predicates -------------
pub fn is_integer() -> Predicate {
    Predicate::new("Integer", |v| matches!(v, Value::Int(_)))
}

pub fn is_string() -> Predicate {
    Predicate::new("String", |v| matches!(v, Value::Str(_)))
}

pub fn is_number() -> Predicate {
    Predicate::new("Number", |v| matches!(v, Value::Int(_) | Value::Real(_)))
}

pub fn is_bool() -> Predicate {
    Predicate::new("Boolean", |v| matches!(v, Value::Bool(_)))
}

pub fn is_null() -> Predicate {
    Predicate::new("None", |v| matches!(v, Value::Null))
}

pub fn is_seq() -> Predicate {
    Predicate::new("Seq", |v| matches!(v, Value::Seq(_)))
}

pub fn is_settings() -> Predicate {
    Predicate::new("Settings", |v| matches!(v, Value::Section(_)))
}

pub fn is_quantity() -> Predicate {
    Predicate::new("Quantity", |v| matches!(v, Value::Quantity(_, _)))
}

/// Matches a quantity carrying exactly the given unit string. Dimensional
/// equivalence (mm vs m) is the unit registry's business, not ours.
pub fn has_unit(unit: &str) -> Predicate {
    let wanted = String::from(unit);
    Predicate::new(&format!("Quantity [{}]", unit), move |v| match v {
        Value::Quantity(_, u) => *u == wanted,
        _ => false,
    })
}

/// Numeric half-open range check, `a <= v < b`.
pub fn in_range(a: f64, b: f64) -> Predicate {
    Predicate::new(&format!("In [{}, {}>", a, b), move |v| {
        match v.as_number() {
            Some(x) => x >= a && x < b,
            None => false,
        }
    })
}

/// Equality against a fixed value.
pub fn equals(expected: Value) -> Predicate {
    Predicate::new(&format!("{}", expected), move |v| *v == expected)
}

/// A sequence each of whose elements satisfies `element`.
pub fn is_seq_of(element: Predicate) -> Predicate {
    let description = format!("Seq[{}]", element.description());
    Predicate::new(&description, move |v| match v {
        Value::Seq(items) => items.iter().all(|item| element.test(item)),
        _ => false,
    })
}

/// The value is a string naming an existing file.
pub fn file_exists() -> Predicate {
    Predicate::new("File", |v| match v {
        Value::Str(path) => Path::new(path).exists(),
        _ => false,
    })
}
