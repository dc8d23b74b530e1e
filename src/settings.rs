//! The hierarchical settings store.
//!
//! A [`Settings`] is an insertion-ordered mapping from string keys to
//! [`Value`]s, where a value may itself be a nested section. Dotted paths
//! address nested locations, so `settings.set("beam.energy", ...)` creates
//! the `beam` section on the fly and writes `energy` inside it.
//!
//! A `Settings` can be bound to a shared [`Model`] at construction time.
//! The model is consulted when a read misses: a schema-declared default is
//! produced, memoized into the store, and returned. Two read paths make the
//! distinction explicit:
//!
//! * [`Settings::peek`] never mutates and reports a miss as `None`;
//! * [`Settings::resolve`] (and its alias [`Settings::get`]) may fill the
//!   default cache, so it takes `&mut self`.
//!
//! Because resolution mutates, a `Settings` that still has unresolved
//! defaults must not be shared between threads without external locking.
//! Run [`apply_defaults_and_check`](crate::transform::apply_defaults_and_check)
//! first if read-only sharing is wanted.
//!
//! Where a dynamic language would intercept attribute access and hand out a
//! falsy placeholder, [`Settings::lookup`] returns a [`Lookup`] sum type; the
//! [`Lookup::Missing`] variant carries a [`TemporaryEntry`] that chains path
//! segments and commits on [`TemporaryEntry::assign`]:
//!
//! ```
//! use tare::settings::{Lookup, Settings};
//! use tare::value::Value;
//!
//! let mut settings = Settings::new();
//! match settings.lookup("a").unwrap() {
//!     Lookup::Found(_) => unreachable!(),
//!     Lookup::Missing(entry) => entry.key("b").key("c").assign(42).unwrap(),
//! }
//! assert!(settings.contains("a"));
//! assert_eq!(settings.peek("a.b.c"), Some(&Value::Int(42)));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use tracing::debug;

use crate::error::{Result, TareError};
use crate::schema::{Model, SchemaNode};
use crate::value::{DocumentMap, Value};

// ------------- Settings -------------
#[derive(Debug, Clone, Default)]
pub struct Settings {
    entries: IndexMap<String, Value>,
    model: Option<Arc<Model>>,
}

impl Settings {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            model: None,
        }
    }
    /// An empty store bound to a model for default resolution. The model is
    /// shared, never owned.
    pub fn with_model(model: Arc<Model>) -> Self {
        Self {
            entries: IndexMap::new(),
            model: Some(model),
        }
    }
    /// Binds a model after construction, e.g. when a document was converted
    /// without a schema and should pick up defaults anyway.
    pub fn bind(&mut self, model: Arc<Model>) {
        self.model = Some(model);
    }
    pub fn model(&self) -> Option<&Arc<Model>> {
        self.model.as_ref()
    }
    /// Converts a document mapping into an unbound settings tree, without
    /// any schema involvement.
    pub fn from_document(map: &DocumentMap) -> Self {
        let mut settings = Settings::new();
        for (key, raw) in map {
            settings.insert(key.clone(), Value::from_document(raw));
        }
        settings
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True iff `key` (a single segment, not a dotted path) is actually
    /// stored. Unresolved defaults and pending [`TemporaryEntry`] paths do
    /// not count as present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores `value` directly under a single key, without path splitting.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Writes `value` at the dotted `path`, creating intermediate sections
    /// as needed. Writing through an existing non-section value is a
    /// structure error.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(TareError::Structure {
                path: String::from(path),
            });
        }
        let (last, parents) = match segments.split_last() {
            Some(parts) => parts,
            None => {
                return Err(TareError::Structure {
                    path: String::from(path),
                });
            }
        };
        let mut cursor = self;
        for segment in parents {
            let slot = cursor
                .entries
                .entry(String::from(*segment))
                .or_insert_with(|| Value::Section(Settings::new()));
            match slot {
                Value::Section(section) => cursor = section,
                _ => {
                    return Err(TareError::Structure {
                        path: String::from(path),
                    });
                }
            }
        }
        cursor.entries.insert(String::from(*last), value.into());
        Ok(())
    }

    /// Non-mutating dotted-path lookup. Returns `None` when any segment is
    /// missing or traverses a non-section; never fills defaults.
    pub fn peek(&self, path: &str) -> Option<&Value> {
        let mut cursor = self;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let value = cursor.entries.get(segment)?;
            if segments.peek().is_none() {
                return Some(value);
            }
            match value {
                Value::Section(section) => cursor = section,
                _ => return None,
            }
        }
        None
    }

    /// Single-segment variant of [`Settings::peek`].
    pub fn peek_key(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Dotted-path lookup with lazy default resolution. A miss at any level
    /// consults that level's bound model; a declared default is produced,
    /// memoized into the store and returned, so this call may mutate `self`.
    /// Subsequent resolutions of the same path return the stored value.
    pub fn resolve(&mut self, path: &str) -> Result<&Value> {
        self.resolve_at(path, path)
    }

    /// Alias for [`Settings::resolve`]; reads mutate the default cache.
    pub fn get(&mut self, path: &str) -> Result<&Value> {
        self.resolve(path)
    }

    fn resolve_at(&mut self, remainder: &str, full: &str) -> Result<&Value> {
        match remainder.split_once('.') {
            None => self.resolve_key(remainder, full),
            Some((head, rest)) => {
                self.resolve_key(head, full)?;
                match self.entries.get_mut(head) {
                    Some(Value::Section(section)) => section.resolve_at(rest, full),
                    _ => Err(TareError::KeyNotFound {
                        path: String::from(full),
                    }),
                }
            }
        }
    }

    // The one-shot miss, compute, memoize transition. Idempotent once the
    // key is present.
    fn resolve_key(&mut self, key: &str, full: &str) -> Result<&Value> {
        if !self.entries.contains_key(key) {
            let default = match &self.model {
                Some(model) => match model.get(key) {
                    Some(SchemaNode::Leaf(leaf)) => leaf.default().cloned(),
                    _ => None,
                },
                None => None,
            };
            match default {
                Some(default) => {
                    let value = default.produce(self)?;
                    debug!(key, %value, "memoizing default");
                    self.entries.insert(String::from(key), value);
                }
                None => {
                    return Err(TareError::KeyNotFound {
                        path: String::from(full),
                    });
                }
            }
        }
        self.entries.get(key).ok_or_else(|| TareError::KeyNotFound {
            path: String::from(full),
        })
    }

    /// Single-segment access that never fails on plain absence: a key that
    /// is neither stored nor declared in the bound model yields
    /// [`Lookup::Missing`] with a [`TemporaryEntry`] for chained deep
    /// assignment. A key declared in the model resolves through the default
    /// machinery, so a declared-but-undefaultable key is still an error.
    pub fn lookup(&mut self, key: &str) -> Result<Lookup<'_>> {
        let present = self.entries.contains_key(key);
        let declared = match &self.model {
            Some(model) => model.contains(key),
            None => false,
        };
        if present || declared {
            return self.resolve_key(key, key).map(Lookup::Found);
        }
        Ok(Lookup::Missing(TemporaryEntry {
            settings: self,
            path: String::from(key),
        }))
    }
}

impl PartialEq for Settings {
    // only stored entries take part in equality, the bound model does not
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

impl Serialize for Settings {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter())
    }
}

impl FromIterator<(String, Value)> for Settings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            model: None,
        }
    }
}

// ------------- Lookup -------------
/// Result of a single-segment [`Settings::lookup`].
#[derive(Debug)]
pub enum Lookup<'a> {
    Found(&'a Value),
    Missing(TemporaryEntry<'a>),
}

impl<'a> Lookup<'a> {
    pub fn found(&self) -> Option<&Value> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing(_) => None,
        }
    }
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

// ------------- TemporaryEntry -------------
/// A pending path into a location that does not exist yet. Builds up dotted
/// segments with [`TemporaryEntry::key`] and writes through
/// [`Settings::set`] on [`TemporaryEntry::assign`]. Until then nothing is
/// stored, so the owner's [`Settings::contains`] keeps reporting false.
pub struct TemporaryEntry<'a> {
    settings: &'a mut Settings,
    path: String,
}

impl<'a> TemporaryEntry<'a> {
    pub fn key(mut self, segment: &str) -> Self {
        self.path.push('.');
        self.path.push_str(segment);
        self
    }
    pub fn path(&self) -> &str {
        &self.path
    }
    pub fn assign(self, value: impl Into<Value>) -> Result<()> {
        self.settings.set(&self.path, value)
    }
}

impl fmt::Debug for TemporaryEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TemporaryEntry <{}>", self.path)
    }
}
