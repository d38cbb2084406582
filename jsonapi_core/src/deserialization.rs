//! Flattening of a single-resource document into a persistence-ready map.
//!
//! `id`, `attributes` and the foreign keys derived from `relationships` are
//! merged into one level:
//!
//! ```text
//! {"data": {"id": "1", "attributes": {"title": "x"},
//!           "relationships": {"comments": {"data": [{"id": "5", "type": "comments"}]},
//!                             "author": {"data": {"id": "9", "type": "people"}}}}}
//! ```
//!
//! becomes `{"id": "1", "title": "x", "comment_ids": ["5"], "author_id": "9"}`.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::document::{Document, Linkage, ResourceObject};
use crate::inflector::{English, Inflector};

/// The deserializer's output: field name to scalar or sequence value.
pub type FlatMap = Map<String, Value>;

/// Field filtering and polymorphic-type options.
///
/// Built from typed values, or from a loosely typed JSON map at the boundary
/// (`{"only": ["name"], "polymorphic": "author"}`), where every value is
/// coerced to a string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct DeserializeOptions {
    /// Keep only these attributes and relationships. Takes precedence over
    /// `except`.
    pub only: Option<BTreeSet<String>>,
    /// Drop these attributes and relationships.
    pub except: Option<BTreeSet<String>>,
    /// To-one relationships that also emit a `<name>_type` field.
    pub polymorphic: BTreeSet<String>,
}

impl DeserializeOptions {
    pub fn with_only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.only = Some(fields.into_iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn with_except<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.except = Some(fields.into_iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn with_polymorphic<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.polymorphic = fields.into_iter().map(|f| f.to_string()).collect();
        self
    }

    /// Applies `only` (or, failing that, `except`) to a map in place.
    fn filter(&self, map: &mut Map<String, Value>) {
        if let Some(only) = &self.only {
            map.retain(|key, _| only.contains(key));
        } else if let Some(except) = &self.except {
            map.retain(|key, _| !except.contains(key));
        }
    }
}

impl From<Value> for DeserializeOptions {
    fn from(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        Self {
            only: map.get("only").and_then(string_set),
            except: map.get("except").and_then(string_set),
            polymorphic: map.get("polymorphic").and_then(string_set).unwrap_or_default(),
        }
    }
}

/// Coerces a scalar or a list of scalars to a set of strings. Null means unset.
fn string_set(value: &Value) -> Option<BTreeSet<String>> {
    let items: Vec<&Value> = match value {
        Value::Null => return None,
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    Some(items.into_iter().map(to_plain_string).collect())
}

fn to_plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Flattens documents using a specific naming service.
pub struct Deserializer<I> {
    inflector: I,
}

impl<I: Inflector> Deserializer<I> {
    pub fn new(inflector: I) -> Self {
        Self { inflector }
    }

    /// Flattens `document` into a field map. Never fails: a document that is
    /// not a mapping yields an empty map, and malformed pieces are skipped.
    pub fn deserialize(&self, document: &Document, options: &DeserializeOptions) -> FlatMap {
        let Some(data) = document.primary_data() else {
            tracing::warn!("Ignoring non-mapping document");
            return FlatMap::new();
        };
        let ResourceObject {
            id,
            mut attributes,
            mut relationships,
        } = ResourceObject::from_data(data);

        options.filter(&mut attributes);
        options.filter(&mut relationships);

        let mut parsed = attributes;
        if let Some(id) = id {
            parsed.insert("id".to_string(), id);
        }

        for (name, entry) in &relationships {
            let singular = self.inflector.singularize(name);
            match Linkage::from_entry(entry) {
                Linkage::ToMany(members) => {
                    let ids = members.into_iter().filter_map(|member| member.id).collect();
                    parsed.insert(format!("{}_ids", singular), Value::Array(ids));
                }
                Linkage::ToOne(target) => {
                    let (id, kind) = match target {
                        Some(target) => (target.id, target.kind),
                        None => (None, None),
                    };
                    parsed.insert(format!("{}_id", singular), id.unwrap_or(Value::Null));

                    if options.polymorphic.contains(name) {
                        let class_name = kind
                            .map(|kind| Value::String(self.inflector.classify(&kind)))
                            .unwrap_or(Value::Null);
                        parsed.insert(format!("{}_type", singular), class_name);
                    }
                }
            }
        }

        parsed
    }
}

/// Flattens `document` with the bundled English inflector.
pub fn deserialize(document: &Document, options: &DeserializeOptions) -> FlatMap {
    static ENGLISH: OnceLock<English> = OnceLock::new();
    Deserializer::new(ENGLISH.get_or_init(English::new)).deserialize(document, options)
}
