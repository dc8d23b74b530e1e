//! Validation and transformation passes over `(Settings, Model)` pairs.
//!
//! The document side of the boundary is an ordered JSON mapping;
//! [`parse_to_model`] pulls one in through the schema's parsers and
//! [`generate_settings`] writes one back out through its generators.
//! [`check_settings`] validates what is stored, and
//! [`apply_defaults_and_check`] is the eager counterpart to the lazy
//! per-read defaulting in [`Settings::resolve`](crate::settings::Settings::resolve):
//! it materializes every literal default up front and validates the result.
//!
//! All passes fail fast: the first offending key aborts the walk, and the
//! error carries the full dotted path to it.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{Result, TareError};
use crate::predicate::Predicate;
use crate::schema::{DefaultValue, Model, SchemaNode};
use crate::settings::Settings;
use crate::value::{Document, DocumentMap, Value};

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        String::from(key)
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Checks every stored entry against the model. A key the model does not
/// declare is a [`TareError::KeyNotFound`]; a failing check is a
/// [`TareError::Validation`] naming the dotted path, the offending value and
/// the expected description. Short-circuits on the first failure.
pub fn check_settings(settings: &Settings, model: &Model) -> Result<()> {
    check_settings_at(settings, model, "")
}

fn check_settings_at(settings: &Settings, model: &Model, prefix: &str) -> Result<()> {
    for (key, value) in settings.iter() {
        let path = join(prefix, key);
        let node = match model.get(key) {
            Some(node) => node,
            None => return Err(TareError::KeyNotFound { path }),
        };
        match node {
            SchemaNode::Leaf(leaf) => {
                if let Some(check) = leaf.check() {
                    trace!(%path, check = check.description(), "checking");
                    if !check.test(value) {
                        return Err(TareError::Validation {
                            path,
                            value: value.to_string(),
                            expected: String::from(check.description()),
                        });
                    }
                }
            }
            SchemaNode::Section(sub) => match value {
                Value::Section(section) => check_settings_at(section, sub, &path)?,
                _ => return Err(TareError::Structure { path }),
            },
        }
    }
    Ok(())
}

/// Parses a document mapping into a [`Settings`] bound to `model`, running
/// each value through the declared parser. Keys the model does not declare
/// are rejected. Sub-model entries recurse; leaves built by
/// [`model_type`](crate::schema::model_type) recurse through their own
/// parser.
pub fn parse_to_model(model: &Arc<Model>, data: &DocumentMap) -> Result<Settings> {
    let settings = parse_at(model, data, "")?;
    debug!(keys = settings.len(), "parsed document against model");
    Ok(settings)
}

fn parse_at(model: &Arc<Model>, data: &DocumentMap, prefix: &str) -> Result<Settings> {
    let mut settings = Settings::with_model(Arc::clone(model));
    for (key, raw) in data {
        let path = join(prefix, key);
        let node = match model.get(key) {
            Some(node) => node,
            None => return Err(TareError::KeyNotFound { path }),
        };
        let value = match node {
            SchemaNode::Leaf(leaf) => leaf.parse(raw).map_err(|e| locate(e, &path))?,
            SchemaNode::Section(sub) => match raw {
                Document::Object(map) => Value::Section(parse_at(sub, map, &path)?),
                other => {
                    return Err(TareError::Parse {
                        path,
                        message: format!("expected a mapping, got {}", other),
                    });
                }
            },
        };
        settings.insert(key.clone(), value);
    }
    Ok(settings)
}

// parsers report locations relative to their own value; fill in the
// enclosing dotted path when they left it empty
fn locate(err: TareError, path: &str) -> TareError {
    match err {
        TareError::Parse { path: p, message } if p.is_empty() => TareError::Parse {
            path: String::from(path),
            message,
        },
        TareError::KeyNotFound { path: p } => TareError::KeyNotFound {
            path: join(path, &p),
        },
        other => other,
    }
}

/// Turns a [`Settings`] back into a document mapping, the inverse of
/// [`parse_to_model`]. With a bound model each value goes through its
/// declared generator; without one, values are stringified. Output ordering
/// matches insertion order.
pub fn generate_settings(settings: &Settings) -> DocumentMap {
    let mut map = DocumentMap::new();
    match settings.model() {
        Some(model) => {
            for (key, value) in settings.iter() {
                let doc = match model.get(key) {
                    Some(SchemaNode::Leaf(leaf)) => leaf.generate(value),
                    Some(SchemaNode::Section(_)) => match value {
                        Value::Section(section) => Document::Object(generate_settings(section)),
                        other => other.to_document(),
                    },
                    None => value.to_document(),
                };
                map.insert(String::from(key), doc);
            }
        }
        None => {
            for (key, value) in settings.iter() {
                map.insert(String::from(key), Document::String(value.to_string()));
            }
        }
    }
    map
}

/// The eager defaulting and validation pass, distinct from the lazy per-read
/// path: walks every key the model declares and returns a new, populated
/// [`Settings`] bound to the model.
///
/// * missing and obligatory: [`TareError::MissingObligatory`];
/// * missing with a literal default: a copy of the default is inserted;
/// * missing with a computed default (or none): left unset, lazy resolution
///   will produce it on first read;
/// * missing sub-model: an empty section bound to the sub-model;
/// * present sub-model: recurses, requiring the stored value to be a
///   section.
///
/// Every materialized leaf must pass its check. Stored keys the model does
/// not declare fail with [`TareError::KeyNotFound`].
pub fn apply_defaults_and_check(settings: &Settings, model: &Arc<Model>) -> Result<Settings> {
    apply_at(settings, model, "")
}

fn apply_at(settings: &Settings, model: &Arc<Model>, prefix: &str) -> Result<Settings> {
    for (key, _) in settings.iter() {
        if !model.contains(key) {
            return Err(TareError::KeyNotFound {
                path: join(prefix, key),
            });
        }
    }
    let mut out = Settings::with_model(Arc::clone(model));
    for (key, node) in model.iter() {
        let path = join(prefix, key);
        match node {
            SchemaNode::Section(sub) => {
                let section = match settings.peek_key(key) {
                    None => {
                        debug!(%path, "inserting empty section");
                        Settings::with_model(Arc::clone(sub))
                    }
                    Some(Value::Section(section)) => apply_at(section, sub, &path)?,
                    Some(_) => return Err(TareError::Structure { path }),
                };
                out.insert(String::from(key), Value::Section(section));
            }
            SchemaNode::Leaf(leaf) => {
                let value = match settings.peek_key(key) {
                    Some(value) => Some(value.clone()),
                    None if leaf.is_obligatory() => {
                        return Err(TareError::MissingObligatory { path });
                    }
                    None => match leaf.default() {
                        Some(DefaultValue::Literal(value)) => {
                            debug!(%path, %value, "filling literal default");
                            Some(value.clone())
                        }
                        // computed defaults are the lazy path's business
                        _ => None,
                    },
                };
                if let Some(value) = value {
                    if let Some(check) = leaf.check() {
                        if !check.test(&value) {
                            return Err(TareError::Validation {
                                path,
                                value: value.to_string(),
                                expected: String::from(check.description()),
                            });
                        }
                    }
                    out.insert(String::from(key), value);
                }
            }
        }
    }
    Ok(out)
}

/// A predicate that accepts a section conforming to `model`. Used by
/// [`model_type`](crate::schema::model_type) and handy on its own.
pub fn conforms(model: Arc<Model>, description: &str) -> Predicate {
    Predicate::new(&format!("Model <{}>", description), move |v| match v {
        Value::Section(section) => check_settings(section, &model).is_ok(),
        _ => false,
    })
}

/// A predicate that accepts a section each of whose values is itself a
/// section conforming to `model`: a dynamically-keyed collection of
/// uniformly-shaped sub-configurations.
pub fn each_value_conforms(model: Arc<Model>, description: &str) -> Predicate {
    Predicate::new(
        &format!("{{key: Model <{}>}}", description),
        move |v| match v {
            Value::Section(section) => section.values().all(|value| match value {
                Value::Section(sub) => check_settings(sub, &model).is_ok(),
                _ => false,
            }),
            _ => false,
        },
    )
}
