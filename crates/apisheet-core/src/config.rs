use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::schema::{BackendKind, SchemaInfo};

/// Default output file written by `apisheet export`.
pub const DEFAULT_OUTPUT: &str = "api_documentation.xlsx";

/// Default worksheet title.
pub const DEFAULT_SHEET_NAME: &str = "API Documentation";

/// Top-level project configuration loaded from `.apisheet.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApisheetConfig {
    /// Pre-generated schema file. When unset the schema is produced by a backend.
    pub input: Option<String>,
    pub output: String,
    pub sheet_name: String,
    pub backend: BackendChoice,
    /// Python interpreter used to probe and run the backends.
    pub python: String,
    pub manage_py: String,
    pub info: SchemaInfo,
}

impl Default for ApisheetConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: DEFAULT_OUTPUT.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            backend: BackendChoice::Auto,
            python: "python".to_string(),
            manage_py: "manage.py".to_string(),
            info: SchemaInfo::default(),
        }
    }
}

/// Which schema backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendChoice {
    /// Probe for drf-spectacular, then drf-yasg.
    #[default]
    Auto,
    Spectacular,
    Yasg,
}

impl BackendChoice {
    /// The pinned backend, or `None` when it should be detected.
    pub fn kind(self) -> Option<BackendKind> {
        match self {
            BackendChoice::Auto => None,
            BackendChoice::Spectacular => Some(BackendKind::Spectacular),
            BackendChoice::Yasg => Some(BackendKind::Yasg),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".apisheet.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ApisheetConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ApisheetConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# apisheet configuration
# input: schema.json        # pre-generated schema; omit to run a backend
output: api_documentation.xlsx
sheet_name: API Documentation
backend: auto               # auto | spectacular | yasg

python: python
manage_py: manage.py

info:
  title: API Documentation
  version: v1
"#
}
