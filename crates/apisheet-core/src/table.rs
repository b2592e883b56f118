use serde::Serialize;

use crate::error::ExportError;
use crate::schema::{ApiSchema, OperationEntry};

/// Header row of every exported sheet.
pub const HEADER: [&str; 5] = [
    "Endpoint",
    "Method",
    "Description",
    "Parameters",
    "Response Codes",
];

/// One exported row: a single operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiRow {
    pub endpoint: String,
    pub method: String,
    pub description: String,
    pub parameters: String,
    pub response_codes: String,
}

impl ApiRow {
    /// Cell values in `HEADER` order.
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.endpoint,
            &self.method,
            &self.description,
            &self.parameters,
            &self.response_codes,
        ]
    }
}

impl From<OperationEntry<'_>> for ApiRow {
    fn from(entry: OperationEntry<'_>) -> Self {
        Self {
            endpoint: entry.path.to_string(),
            method: entry.method.to_uppercase(),
            description: entry.description.to_string(),
            parameters: entry.parameter_names.join(", "),
            response_codes: entry.response_codes.join(", "),
        }
    }
}

/// A named sheet of rows, header excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiTable {
    pub sheet_name: String,
    pub rows: Vec<ApiRow>,
}

impl ApiTable {
    pub fn from_schema(sheet_name: &str, schema: &ApiSchema) -> Result<Self, ExportError> {
        Ok(Self {
            sheet_name: sheet_name.to_string(),
            rows: flatten(schema)?,
        })
    }
}

/// Flatten a schema into one row per (path, method), in document order.
pub fn flatten(schema: &ApiSchema) -> Result<Vec<ApiRow>, ExportError> {
    Ok(schema
        .operations()?
        .into_iter()
        .map(ApiRow::from)
        .collect())
}
