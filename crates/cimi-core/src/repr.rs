//! Resource representations as returned by the provider.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::types::Reference;

/// Attributes every CIMI resource may carry.
pub const COMMON_ATTRIBUTES: &[&str] = &[
    "id",
    "name",
    "description",
    "created",
    "updated",
    "properties",
];

/// Bookkeeping attributes that never show up as resource data.
const PROTOCOL_ATTRIBUTES: &[&str] = &["href", "resourceURI", "operations"];

/// An advertised operation: a name bound to the reference that invokes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Provider-defined operation name (`add`, `delete`, or an action URI).
    #[serde(rename = "rel")]
    pub name: String,
    /// Where to send the request.
    pub href: Reference,
}

/// The last-known server-side state of a resource or collection.
///
/// Attributes are kept as raw JSON; typed views live on the resource
/// handles. Operations are pulled out of the body so lookups don't have to
/// re-parse them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Representation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    operations: Vec<Operation>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl Representation {
    /// Build a representation from a JSON body.
    ///
    /// # Errors
    ///
    /// Fails with a malformed-response error unless `value` is an object
    /// whose `operations` (if present) are well formed.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        if !value.is_object() {
            return Err(Error::malformed(format!(
                "expected a JSON object, got {}",
                type_name(&value)
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// The resource's own reference: `href`, falling back to `id`.
    pub fn reference(&self) -> Option<Reference> {
        ["href", "id"]
            .iter()
            .filter_map(|key| self.attributes.get(*key))
            .find_map(|v| serde_json::from_value::<Reference>(v.clone()).ok())
    }

    /// The `resourceURI` type marker, when the provider sends one.
    pub fn resource_uri(&self) -> Option<&str> {
        self.str_attr("resourceURI")
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|v| !v.is_null())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.attributes.get_mut(name)
    }

    pub fn str_attr(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn i64_attr(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn bool_attr(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// An attribute holding a reference, in either wire form.
    pub fn ref_attr(&self, name: &str) -> Option<Reference> {
        self.get(name)
            .and_then(|v| serde_json::from_value::<Reference>(v.clone()).ok())
    }

    /// The array stored under `key`, for collection documents.
    pub fn array(&self, key: &str) -> &[Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// String-valued `properties` map.
    pub fn properties(&self) -> Vec<(String, String)> {
        self.get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(k, v)| (k.clone(), display_value(v)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Attributes outside the common set, the protocol bookkeeping, and
    /// `owned`.
    pub fn extension_attributes(&self, owned: &[&str]) -> Vec<(&str, &Value)> {
        self.attributes
            .iter()
            .filter(|(k, v)| {
                !v.is_null()
                    && !COMMON_ATTRIBUTES.contains(&k.as_str())
                    && !PROTOCOL_ATTRIBUTES.contains(&k.as_str())
                    && !owned.contains(&k.as_str())
            })
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }

    /// Attribute-wise equality restricted to `attributes`.
    pub fn same_attributes(&self, other: &Representation, attributes: &[&str]) -> bool {
        attributes.iter().all(|a| self.get(a) == other.get(a))
    }

    /// Merge the fields of a fetched relation document into the attribute
    /// `relation` in place. Existing fields not present in `fetched` stay.
    pub(crate) fn merge_relation(&mut self, relation: &str, fetched: Representation) {
        let slot = self
            .attributes
            .entry(relation.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(target) = slot {
            for (k, v) in fetched.attributes {
                if k == "href" && target.contains_key("href") {
                    continue;
                }
                target.insert(k, v);
            }
            if !fetched.operations.is_empty() {
                target.insert(
                    "operations".to_string(),
                    serde_json::to_value(&fetched.operations).unwrap_or(Value::Null),
                );
            }
        }
    }
}

/// Renders a JSON value for humans: strings without quotes.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
