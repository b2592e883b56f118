use std::ops::Deref;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, de};

use super::OperationEntry;

/// Operations of one path, keyed by HTTP method.
///
/// Path-level fields (`summary`, `parameters`, `servers`, ...) and `x-` extensions
/// are dropped while deserializing; only operation objects are kept.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct PathItem(IndexMap<String, Operation>);

impl PathItem {
    pub fn new(operations: IndexMap<String, Operation>) -> Self {
        Self(operations)
    }
}

impl Deref for PathItem {
    type Target = IndexMap<String, Operation>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut operations = IndexMap::new();
        for (key, value) in raw {
            if !value.is_object() || key.starts_with("x-") {
                continue;
            }
            let operation = serde_json::from_value(value).map_err(de::Error::custom)?;
            operations.insert(key, operation);
        }
        Ok(Self(operations))
    }
}

/// Schema emitted by drf-spectacular (OpenAPI 3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectacularSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<serde_json::Value>,

    paths: IndexMap<String, PathItem>,
}

impl SpectacularSchema {
    pub fn new(paths: IndexMap<String, PathItem>) -> Self {
        Self {
            openapi: None,
            info: None,
            paths,
        }
    }

    /// Path → method → operation mapping.
    pub fn paths(&self) -> &IndexMap<String, PathItem> {
        &self.paths
    }

    pub(crate) fn operations(&self) -> Vec<OperationEntry<'_>> {
        self.paths
            .iter()
            .flat_map(|(path, item)| {
                item.iter().map(move |(method, op)| OperationEntry {
                    path,
                    method,
                    description: op.description.as_deref().unwrap_or(""),
                    parameter_names: op
                        .parameters
                        .iter()
                        .filter_map(|p| p.name.as_deref())
                        .collect(),
                    response_codes: op.responses.keys().map(String::as_str).collect(),
                })
            })
            .collect()
    }
}

/// The subset of an operation object the exporter reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, serde_json::Value>,
}

/// A parameter entry. `$ref` entries carry no name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
