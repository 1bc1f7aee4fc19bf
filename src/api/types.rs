use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Parameters of a flow query; unique by `(product, module)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowQueryParams {
    pub product: String,
    pub module: String,
}

impl FlowQueryParams {
    pub fn new(product: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            module: module.into(),
        }
    }
}

/// Parameters of a cause path query; unique by `symptom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CausePathParams {
    pub symptom: String,
}

impl CausePathParams {
    pub fn new(symptom: impl Into<String>) -> Self {
        Self {
            symptom: symptom.into(),
        }
    }
}

/// One row of a flow query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowItem {
    pub id: String,
    pub title: String,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<String>,
}

/// A node on a cause path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub id: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

/// A relation on a cause path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRelation {
    pub id: String,
    #[serde(rename = "type")]
    pub relation_type: String,
    #[serde(alias = "start_node")]
    pub source: String,
    #[serde(alias = "end_node")]
    pub target: String,
}

/// A graph fragment leading from a symptom to its causes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CausePath {
    #[serde(default)]
    pub nodes: Vec<PathNode>,
    #[serde(default)]
    pub relations: Vec<PathRelation>,
}

/// Filters for the dictionary listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DictionaryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl DictionaryQuery {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(category) = &self.category {
            query.push(("category", category.clone()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("page_size", page_size.to_string()));
        }
        query
    }
}

/// A dictionary term as created or edited by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub term: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Pull a list out of a payload that is either the list itself or an object
/// holding it under one of `keys`.
pub(crate) fn list_payload(payload: Value, keys: &[&str]) -> Value {
    match payload {
        Value::Array(_) => payload,
        Value::Object(mut obj) => keys
            .iter()
            .find_map(|k| obj.remove(*k))
            .unwrap_or(Value::Array(Vec::new())),
        _ => Value::Array(Vec::new()),
    }
}

/// Body for a Cypher passthrough query.
pub(crate) fn cypher_body(cypher: &str, parameters: Map<String, Value>) -> Value {
    serde_json::json!({
        "cypher_query": cypher,
        "parameters": Value::Object(parameters),
    })
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
