//! Inbound resource documents and the lenient views the deserializer reads
//! them through.

use serde_json::{Map, Value};

use crate::query::QueryParams;
use crate::Error;

/// A form-style parameter tree whose nested keys are all trusted, e.g. the
/// decoded body `data[id]=1&data[attributes][name]=x`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawParameters(Map<String, Value>);

impl From<Map<String, Value>> for RawParameters {
    fn from(map: Map<String, Value>) -> Self {
        RawParameters(map)
    }
}

impl RawParameters {
    /// Decodes a form-encoded body into a nested tree.
    pub fn parse(form: &str) -> Self {
        RawParameters(QueryParams::parse(form).as_map().clone())
    }

    /// Returns the `data` subtree, if any.
    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }
}

/// Input to the deserializer. The caller picks the variant.
#[derive(Clone, Debug, PartialEq)]
pub enum Document {
    /// A decoded JSON value. Only objects carry data.
    Json(Value),
    /// A trusted form-style parameter tree.
    Raw(RawParameters),
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Document::Json(value)
    }
}

impl From<RawParameters> for Document {
    fn from(params: RawParameters) -> Self {
        Document::Raw(params)
    }
}

impl Document {
    /// Parses JSON text into a [`Document::Json`].
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        Ok(Document::Json(serde_json::from_str(input)?))
    }

    /// Returns the primary `data` object, or `None` when the document is not
    /// a mapping at all. A mapping without usable `data` yields an empty
    /// object.
    pub(crate) fn primary_data(&self) -> Option<Map<String, Value>> {
        let data = match self {
            Document::Json(Value::Object(map)) => map.get("data"),
            Document::Json(_) => return None,
            Document::Raw(params) => params.data(),
        };
        Some(match data {
            Some(Value::Object(data)) => data.clone(),
            _ => Map::new(),
        })
    }
}

/// A `{id, type}` reference inside relationship linkage.
#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    pub id: Option<Value>,
    pub kind: Option<String>,
}

impl Identifier {
    fn from_value(value: &Value) -> Self {
        let id = value.get("id").filter(|id| is_present(id)).cloned();
        let kind = value.get("type").and_then(|kind| match kind {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
        Identifier { id, kind }
    }
}

/// The linkage of one relationship entry.
#[derive(Clone, Debug, PartialEq)]
pub enum Linkage {
    /// A single reference, or `None` for null/missing/malformed linkage.
    ToOne(Option<Identifier>),
    /// An ordered sequence of references.
    ToMany(Vec<Identifier>),
}

impl Linkage {
    /// Reads `entry.data`, coalescing anything unexpected to an empty to-one.
    pub fn from_entry(entry: &Value) -> Self {
        match entry.get("data") {
            Some(Value::Array(items)) => Linkage::ToMany(
                items
                    .iter()
                    .filter(|item| item.is_object())
                    .map(Identifier::from_value)
                    .collect(),
            ),
            Some(data @ Value::Object(_)) => Linkage::ToOne(Some(Identifier::from_value(data))),
            _ => Linkage::ToOne(None),
        }
    }
}

/// The pieces of a resource object the deserializer consumes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceObject {
    pub id: Option<Value>,
    pub attributes: Map<String, Value>,
    pub relationships: Map<String, Value>,
}

impl ResourceObject {
    /// Splits a primary data object. Non-object `attributes` or
    /// `relationships` are treated as empty.
    pub fn from_data(mut data: Map<String, Value>) -> Self {
        let id = data.remove("id").filter(is_present);
        let attributes = match data.remove("attributes") {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let relationships = match data.remove("relationships") {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        ResourceObject {
            id,
            attributes,
            relationships,
        }
    }
}

fn is_present(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primary_data_from_json() {
        let doc = Document::from(json!({"data": {"id": "1"}}));
        assert_eq!(doc.primary_data().unwrap().get("id"), Some(&json!("1")));
    }

    #[test]
    fn primary_data_non_mapping() {
        assert!(Document::from(json!([1, 2])).primary_data().is_none());
        assert!(Document::from(json!("text")).primary_data().is_none());
    }

    #[test]
    fn primary_data_missing_or_scalar_data_is_empty() {
        assert!(Document::from(json!({})).primary_data().unwrap().is_empty());
        assert!(Document::from(json!({"data": 3})).primary_data().unwrap().is_empty());
    }

    #[test]
    fn primary_data_from_raw_parameters() {
        let raw = RawParameters::parse("data[id]=4&data[attributes][name]=x");
        let data = Document::from(raw).primary_data().unwrap();
        assert_eq!(data.get("attributes"), Some(&json!({"name": "x"})));
    }

    #[test]
    fn from_json_str_rejects_invalid_text() {
        assert!(Document::from_json_str("{nope").is_err());
    }

    #[test]
    fn linkage_shapes() {
        assert_eq!(
            Linkage::from_entry(&json!({"data": null})),
            Linkage::ToOne(None)
        );
        assert_eq!(Linkage::from_entry(&json!("junk")), Linkage::ToOne(None));
        assert_eq!(
            Linkage::from_entry(&json!({"data": {"id": "9", "type": "people"}})),
            Linkage::ToOne(Some(Identifier {
                id: Some(json!("9")),
                kind: Some("people".to_string()),
            }))
        );
        match Linkage::from_entry(&json!({"data": [{"id": "1"}, 7, {"type": "x"}]})) {
            Linkage::ToMany(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[1].id, None);
            }
            other => panic!("expected to-many, got {:?}", other),
        }
    }

    #[test]
    fn resource_object_ignores_non_object_sections() {
        let data = json!({"id": null, "attributes": [1], "relationships": "x"});
        let resource = ResourceObject::from_data(data.as_object().unwrap().clone());
        assert_eq!(resource, ResourceObject::default());
    }
}
