//! Tare – schema-validated hierarchical settings for scientific pipelines.
//!
//! Tare keeps a simulation's configuration in a [`settings::Settings`] tree:
//! an insertion-ordered, dotted-path-addressable store whose shape and
//! values are described by a declarative [`schema::Model`]. Documents parsed
//! from disk enter through [`transform::parse_to_model`], get validated and
//! defaulted against the schema, and leave again through
//! [`transform::generate_settings`]:
//!
//! * A [`predicate::Predicate`] is a named, composable boolean test.
//! * A [`schema::Type`] describes one setting: description, default
//!   (literal or computed from sibling settings), validity check,
//!   obligatory flag, and the parser/generator pair crossing the document
//!   boundary.
//! * A [`schema::Model`] maps keys to types or nested sub-models;
//!   [`schema::model_type`] wraps a sub-model so sections compose like
//!   leaves.
//! * A [`settings::Settings`] stores the values, resolving missing keys
//!   against its bound model lazily and memoizing the result.
//!
//! ## Modules
//! * [`settings`] – the hierarchical store, dotted-path access, lazy
//!   default resolution, deep assignment through temporary entries.
//! * [`schema`] – models, types and default declarations.
//! * [`predicate`] – composable checks plus a stock predicate library.
//! * [`transform`] – parse, generate, check and eager-default passes.
//! * [`convert`] – stock quantity parsers/generators for document strings.
//! * [`value`] – the value enum and the document representation.
//! * [`error`] – the crate-wide error type.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use tare::predicate::{in_range, is_integer};
//! use tare::schema::{Model, Type};
//! use tare::transform::{apply_defaults_and_check, generate_settings, parse_to_model};
//!
//! let mut model = Model::new();
//! model.insert("iterations", Type::new("Number of trajectories to run.")
//!     .with_check(is_integer() & in_range(1.0, 1e9))
//!     .with_default(1000)).unwrap();
//! model.insert("tag", Type::new("Label attached to the output.")
//!     .obligatory(true)).unwrap();
//! let model = Arc::new(model);
//!
//! let doc = serde_json::json!({ "tag": "demo" });
//! let parsed = parse_to_model(&model, doc.as_object().unwrap()).unwrap();
//! let full = apply_defaults_and_check(&parsed, &model).unwrap();
//! assert_eq!(full.peek("iterations").and_then(|v| v.as_int()), Some(1000));
//! assert_eq!(generate_settings(&full)["tag"], serde_json::json!("demo"));
//! ```
//!
//! Checks, defaults and conversions all live in the schema, so the store
//! itself stays a plain ordered mapping; anything with real I/O (document
//! loading, unit registries, interpolation tables) stays outside this crate
//! and talks to it through the functions above.

pub mod convert;
pub mod error;
pub mod predicate;
pub mod schema;
pub mod settings;
pub mod transform;
pub mod value;

pub use error::{Result, TareError};
pub use predicate::Predicate;
pub use schema::{Model, SchemaNode, Type, model_type};
pub use settings::{Lookup, Settings, TemporaryEntry};
pub use transform::{
    apply_defaults_and_check, check_settings, conforms, each_value_conforms, generate_settings,
    parse_to_model,
};
pub use value::{Document, DocumentMap, Value};
