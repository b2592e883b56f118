pub mod spectacular;
pub mod yasg;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use spectacular::SpectacularSchema;
pub use yasg::YasgSchema;

use crate::error::ExportError;

/// The schema-generation library a schema came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Spectacular,
    Yasg,
}

impl BackendKind {
    /// Distribution name, as shown to users.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Spectacular => "drf-spectacular",
            BackendKind::Yasg => "drf-yasg",
        }
    }

    /// Importable Python module name.
    pub fn module(&self) -> &'static str {
        match self {
            BackendKind::Spectacular => "drf_spectacular",
            BackendKind::Yasg => "drf_yasg",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive metadata handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaInfo {
    pub title: String,
    pub version: String,
}

impl Default for SchemaInfo {
    fn default() -> Self {
        Self {
            title: "API Documentation".to_string(),
            version: "v1".to_string(),
        }
    }
}

/// A schema document tagged with the backend that produced it.
///
/// The two backends emit structures that must be read differently, so the
/// tag is decided once at acquisition time and carried with the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiSchema {
    Spectacular(SpectacularSchema),
    Yasg(YasgSchema),
}

impl ApiSchema {
    pub fn kind(&self) -> BackendKind {
        match self {
            ApiSchema::Spectacular(_) => BackendKind::Spectacular,
            ApiSchema::Yasg(_) => BackendKind::Yasg,
        }
    }

    /// Wrap a decoded JSON document in the variant for `kind`.
    pub fn from_value(kind: BackendKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            BackendKind::Spectacular => ApiSchema::Spectacular(serde_json::from_value(value)?),
            BackendKind::Yasg => ApiSchema::Yasg(YasgSchema::new(value)),
        })
    }

    pub fn from_json(kind: BackendKind, input: &str) -> serde_json::Result<Self> {
        Self::from_value(kind, serde_json::from_str(input)?)
    }

    /// Every operation in document order: paths first, then methods within a path.
    pub fn operations(&self) -> Result<Vec<OperationEntry<'_>>, ExportError> {
        match self {
            ApiSchema::Spectacular(schema) => Ok(schema.operations()),
            ApiSchema::Yasg(schema) => schema.operations(),
        }
    }
}

/// One (path, method) pair with the fields the table needs, borrowed from the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationEntry<'a> {
    pub path: &'a str,
    pub method: &'a str,
    pub description: &'a str,
    pub parameter_names: Vec<&'a str>,
    pub response_codes: Vec<&'a str>,
}
