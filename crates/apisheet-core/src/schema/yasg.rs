use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::OperationEntry;
use crate::error::ExportError;

/// Schema emitted by drf-yasg (Swagger 2.0), kept as a plain mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YasgSchema(Value);

impl YasgSchema {
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    pub fn document(&self) -> &Value {
        &self.0
    }

    /// The top-level `"paths"` mapping.
    pub fn paths(&self) -> Result<&Map<String, Value>, ExportError> {
        self.0
            .get("paths")
            .ok_or_else(|| ExportError::MalformedSchema("missing top-level \"paths\"".into()))?
            .as_object()
            .ok_or_else(|| ExportError::MalformedSchema("\"paths\" is not a mapping".into()))
    }

    pub(crate) fn operations(&self) -> Result<Vec<OperationEntry<'_>>, ExportError> {
        let mut entries = Vec::new();
        for (path, item) in self.paths()? {
            let item = item.as_object().ok_or_else(|| {
                ExportError::MalformedSchema(format!("path item {path} is not a mapping"))
            })?;
            for (method, op) in item {
                // Path-level `parameters` arrays and `x-` extensions are not operations.
                let Some(op) = op.as_object() else { continue };
                if method.starts_with("x-") {
                    continue;
                }
                entries.push(operation_entry(path, method, op));
            }
        }
        Ok(entries)
    }
}

fn operation_entry<'a>(
    path: &'a str,
    method: &'a str,
    op: &'a Map<String, Value>,
) -> OperationEntry<'a> {
    let description = op
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("");

    let parameter_names = op
        .get("parameters")
        .and_then(Value::as_array)
        .map(|params| {
            params
                .iter()
                .filter_map(|p| p.get("name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    let response_codes = op
        .get("responses")
        .and_then(Value::as_object)
        .map(|responses| responses.keys().map(String::as_str).collect())
        .unwrap_or_default();

    OperationEntry {
        path,
        method,
        description,
        parameter_names,
        response_codes,
    }
}
