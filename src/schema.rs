//! Declarative schemas for settings trees.
//!
//! A [`Model`] is an ordered mapping from key to [`SchemaNode`], where a
//! node is either a [`Type`] leaf or a nested sub-model. Models are authored
//! once, treated as immutable afterwards, and shared read-only through
//! `Arc` by any number of [`Settings`](crate::settings::Settings) instances.
//!
//! A [`Type`] describes one leaf: what the setting means, whether it is
//! obligatory, an optional default (a literal value or one computed from
//! sibling settings), an optional validity [`Predicate`], and the pair of
//! converter functions that move values across the document boundary.
//!
//! [`model_type`] turns a whole sub-model into a leaf `Type`, so nested
//! sections compose exactly like scalar settings do.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Result, TareError};
use crate::predicate::Predicate;
use crate::settings::Settings;
use crate::transform::{conforms, generate_settings, parse_to_model};
use crate::value::{Document, Value};

type Parser = Arc<dyn Fn(&Document) -> Result<Value> + Send + Sync>;
type Generator = Arc<dyn Fn(&Value) -> Document + Send + Sync>;
type Producer = Arc<dyn Fn(&Settings) -> Result<Value> + Send + Sync>;

// width the documentation rendering wraps at, including the prefix
const DISPLAY_WIDTH: usize = 66;

// ------------- DefaultValue -------------
/// A schema-declared default: either a literal value, or a function that
/// computes one from the sibling settings the first time the key is read.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Computed(Producer),
}

impl DefaultValue {
    /// Produces the concrete value. Computed defaults see the enclosing
    /// settings read-only; they report a missing sibling as an error rather
    /// than panicking.
    pub fn produce(&self, settings: &Settings) -> Result<Value> {
        match self {
            DefaultValue::Literal(value) => Ok(value.clone()),
            DefaultValue::Computed(produce) => produce(settings),
        }
    }
    pub fn literal(&self) -> Option<&Value> {
        match self {
            DefaultValue::Literal(value) => Some(value),
            DefaultValue::Computed(_) => None,
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DefaultValue::Literal(value) => write!(f, "{}", value),
            DefaultValue::Computed(_) => write!(f, "<computed from other settings>"),
        }
    }
}

// ------------- Type -------------
/// The type of a single setting.
#[derive(Clone)]
pub struct Type {
    description: String,
    default: Option<DefaultValue>,
    check: Option<Predicate>,
    obligatory: bool,
    parser: Parser,
    generator: Generator,
    nested: Option<Arc<Model>>,
}

impl Type {
    /// A type with identity conversions, no check, no default. Refine it
    /// with the builder methods below.
    pub fn new(description: &str) -> Self {
        Self {
            description: String::from(description),
            default: None,
            check: None,
            obligatory: false,
            parser: Arc::new(|doc: &Document| Ok(Value::from_document(doc))),
            generator: Arc::new(Value::to_document),
            nested: None,
        }
    }
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }
    /// A default computed from sibling settings on first read. The result
    /// is memoized, so the function runs at most once per store.
    pub fn with_computed_default<F>(mut self, produce: F) -> Self
    where
        F: Fn(&Settings) -> Result<Value> + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Computed(Arc::new(produce)));
        self
    }
    pub fn with_check(mut self, check: Predicate) -> Self {
        self.check = Some(check);
        self
    }
    /// Obligatory settings must be supplied by the caller; defaults are
    /// never substituted for them.
    pub fn obligatory(mut self, obligatory: bool) -> Self {
        self.obligatory = obligatory;
        self
    }
    pub fn with_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&Document) -> Result<Value> + Send + Sync + 'static,
    {
        self.parser = Arc::new(parser);
        self
    }
    pub fn with_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn(&Value) -> Document + Send + Sync + 'static,
    {
        self.generator = Arc::new(generator);
        self
    }
    pub(crate) fn with_nested(mut self, model: Arc<Model>) -> Self {
        self.nested = Some(model);
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }
    pub fn check(&self) -> Option<&Predicate> {
        self.check.as_ref()
    }
    pub fn is_obligatory(&self) -> bool {
        self.obligatory
    }
    /// The sub-model behind a [`model_type`] leaf, if any.
    pub fn nested_model(&self) -> Option<&Arc<Model>> {
        self.nested.as_ref()
    }
    pub fn parse(&self, doc: &Document) -> Result<Value> {
        (self.parser)(doc)
    }
    pub fn generate(&self, value: &Value) -> Document {
        (self.generator)(value)
    }

    /// Renders the description, default and check of this type as indented
    /// documentation text. Nested model types render their whole subtree.
    pub fn display(&self, prefix: &str) -> String {
        if let Some(model) = &self.nested {
            let mut out = wrap_description(&self.description, prefix);
            for (key, node) in model.iter() {
                out.push('\n');
                out.push_str(prefix);
                out.push('\n');
                out.push_str(&format!("{}+ {}\n", prefix, key));
                out.push_str(&node.display(&format!("{}|   ", prefix)));
            }
            return out;
        }
        let default = match &self.default {
            Some(default) => format!("{:?}", default),
            None => String::from("None"),
        };
        let check = match &self.check {
            Some(check) => String::from(check.description()),
            None => String::from("Any"),
        };
        format!(
            "{}\n{}\n{}(default) {}\n{}(type)    {}",
            wrap_description(&self.description, prefix),
            prefix,
            prefix,
            default,
            prefix,
            check
        )
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Type")
            .field("description", &self.description)
            .field("default", &self.default)
            .field("check", &self.check)
            .field("obligatory", &self.obligatory)
            .finish()
    }
}

fn wrap_description(description: &str, prefix: &str) -> String {
    let width = DISPLAY_WIDTH.saturating_sub(prefix.len()).max(16);
    let marked = format!("{}⋮ ", prefix);
    textwrap::fill(
        description,
        textwrap::Options::new(width)
            .initial_indent(&marked)
            .subsequent_indent(&marked),
    )
}

// ------------- SchemaNode -------------
/// One entry in a [`Model`]: a leaf type or a nested sub-model.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Leaf(Type),
    Section(Arc<Model>),
}

impl SchemaNode {
    pub fn display(&self, prefix: &str) -> String {
        match self {
            SchemaNode::Leaf(leaf) => leaf.display(prefix),
            SchemaNode::Section(model) => model.display(prefix),
        }
    }
}

impl From<Type> for SchemaNode {
    fn from(leaf: Type) -> SchemaNode {
        SchemaNode::Leaf(leaf)
    }
}
impl From<Model> for SchemaNode {
    fn from(model: Model) -> SchemaNode {
        SchemaNode::Section(Arc::new(model))
    }
}
impl From<Arc<Model>> for SchemaNode {
    fn from(model: Arc<Model>) -> SchemaNode {
        SchemaNode::Section(model)
    }
}

// ------------- Model -------------
/// An ordered schema tree that settings can be matched against for
/// correctness of structure and values, and that doubles as the source of
/// defaults for missing entries.
#[derive(Debug, Clone, Default)]
pub struct Model {
    entries: IndexMap<String, SchemaNode>,
}

impl Model {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
    /// Builds a model from `(key, node)` pairs, in order.
    pub fn from_entries<I, N>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'static str, N)>,
        N: Into<SchemaNode>,
    {
        let mut model = Model::new();
        for (key, node) in entries {
            model.insert(key, node)?;
        }
        Ok(model)
    }
    /// Inserts a schema entry. Keys address single segments, so they must be
    /// non-empty and free of `.`.
    pub fn insert(&mut self, key: &str, node: impl Into<SchemaNode>) -> Result<()> {
        if key.is_empty() || key.contains('.') {
            return Err(TareError::Schema(format!(
                "invalid model key `{}`: keys are non-empty single segments",
                key
            )));
        }
        self.entries.insert(String::from(key), node.into());
        Ok(())
    }
    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.entries.get(key)
    }
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the whole schema as indented documentation text.
    pub fn display(&self, prefix: &str) -> String {
        let mut parts = Vec::new();
        for (key, node) in self.iter() {
            parts.push(format!(
                "{}+ {}\n{}",
                prefix,
                key,
                node.display(&format!("{}|   ", prefix))
            ));
        }
        parts.join(&format!("\n{}\n", prefix))
    }
}

// ------------- model_type -------------
/// Wraps a whole sub-model as a leaf [`Type`], so a nested section composes
/// like any scalar setting. The check is "conforms to the sub-model" ANDed
/// with the optional extra check; parsing and generation recurse through
/// [`parse_to_model`] and [`generate_settings`].
pub fn model_type(
    model: Arc<Model>,
    name: &str,
    description: &str,
    check: Option<Predicate>,
    obligatory: bool,
) -> Type {
    let conforming = match check {
        Some(extra) => conforms(Arc::clone(&model), name).and(&extra),
        None => conforms(Arc::clone(&model), name),
    };
    let parse_model = Arc::clone(&model);
    Type::new(description)
        .with_check(conforming)
        .obligatory(obligatory)
        .with_parser(move |doc: &Document| match doc {
            Document::Object(map) => Ok(Value::Section(parse_to_model(&parse_model, map)?)),
            other => Err(TareError::Parse {
                path: String::new(),
                message: format!("expected a mapping, got {}", other),
            }),
        })
        .with_generator(|value: &Value| match value {
            Value::Section(section) => Document::Object(generate_settings(section)),
            other => other.to_document(),
        })
        .with_nested(model)
}
