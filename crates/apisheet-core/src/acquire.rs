use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, error, info};

use crate::config::ApisheetConfig;
use crate::error::AcquireError;
use crate::schema::{ApiSchema, BackendKind, SchemaInfo};

/// A library able to introspect the project and produce its schema.
pub trait SchemaBackend {
    fn kind(&self) -> BackendKind;

    /// Whether the backend can be used in this environment.
    fn is_available(&self) -> bool;

    /// Produce the schema, without any request context.
    ///
    /// Backends forward only the parts of `info` their generator accepts.
    fn generate(&self, info: &SchemaInfo) -> Result<ApiSchema, AcquireError>;
}

/// Runs a backend through the project's Django `manage.py`.
#[derive(Debug, Clone)]
pub struct ManagePyBackend {
    kind: BackendKind,
    python: String,
    manage_py: PathBuf,
}

impl ManagePyBackend {
    pub fn new(kind: BackendKind, python: impl Into<String>, manage_py: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            python: python.into(),
            manage_py: manage_py.into(),
        }
    }

    pub fn from_config(kind: BackendKind, config: &ApisheetConfig) -> Self {
        Self::new(kind, config.python.clone(), config.manage_py.clone())
    }

    /// Management command arguments that print the schema as JSON on stdout.
    ///
    /// Only `info.version` is forwarded, and only to drf-yasg: neither command takes a
    /// title, so `info.title` never reaches the generated schema.
    pub fn command_args(&self, info: &SchemaInfo) -> Vec<String> {
        match self.kind {
            BackendKind::Spectacular => vec![
                "spectacular".to_string(),
                "--format".to_string(),
                "openapi-json".to_string(),
            ],
            BackendKind::Yasg => vec![
                "generate_swagger".to_string(),
                "--format".to_string(),
                "json".to_string(),
                "--api-version".to_string(),
                info.version.clone(),
                "-".to_string(),
            ],
        }
    }
}

impl SchemaBackend for ManagePyBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        let probe = format!("import {}", self.kind.module());
        let available = Command::new(&self.python)
            .args(["-c", &probe])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        debug!("{} available: {}", self.kind, available);
        available
    }

    // drf-yasg receives `info.version`; the title is not sent to either command.
    fn generate(&self, info: &SchemaInfo) -> Result<ApiSchema, AcquireError> {
        let backend = self.kind.to_string();
        let output = Command::new(&self.python)
            .arg(&self.manage_py)
            .args(self.command_args(info))
            .output()
            .map_err(|source| AcquireError::Spawn {
                backend: backend.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AcquireError::CommandFailed {
                backend,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout)
            .and_then(|value| ApiSchema::from_value(self.kind, value))
            .map_err(|source| AcquireError::InvalidSchema { backend, source })
    }
}

/// The candidate backends in priority order: drf-spectacular, then drf-yasg.
pub fn default_backends(config: &ApisheetConfig) -> Vec<Box<dyn SchemaBackend>> {
    [BackendKind::Spectacular, BackendKind::Yasg]
        .into_iter()
        .map(|kind| {
            Box::new(ManagePyBackend::from_config(kind, config)) as Box<dyn SchemaBackend>
        })
        .collect()
}

/// The backend chosen for this run, resolved once and passed explicitly.
pub struct BackendSelection {
    backend: Option<Box<dyn SchemaBackend>>,
    info: SchemaInfo,
}

impl BackendSelection {
    /// Probe `candidates` in order and keep the first available one.
    pub fn detect(candidates: Vec<Box<dyn SchemaBackend>>, info: SchemaInfo) -> Self {
        let backend = candidates.into_iter().find(|b| b.is_available());
        Self { backend, info }
    }

    /// Use `backend` without probing.
    pub fn forced(backend: Box<dyn SchemaBackend>, info: SchemaInfo) -> Self {
        Self {
            backend: Some(backend),
            info,
        }
    }

    /// Build the selection described by `config`.
    pub fn from_config(config: &ApisheetConfig) -> Self {
        let info = config.info.clone();
        match config.backend.kind() {
            Some(kind) => Self::forced(Box::new(ManagePyBackend::from_config(kind, config)), info),
            None => Self::detect(default_backends(config), info),
        }
    }

    pub fn selected(&self) -> Option<BackendKind> {
        self.backend.as_ref().map(|b| b.kind())
    }

    pub fn info(&self) -> &SchemaInfo {
        &self.info
    }
}

/// Generate the schema with the selected backend.
pub fn acquire_schema(selection: &BackendSelection) -> Result<ApiSchema, AcquireError> {
    let Some(backend) = selection.backend.as_ref() else {
        let err = AcquireError::MissingBackend;
        error!("{err}");
        return Err(err);
    };

    info!("Using {} to generate the schema.", backend.kind());
    backend.generate(&selection.info)
}

/// Read an already generated schema document (JSON, or YAML for any other extension).
///
/// Without an explicit `kind`, Swagger 2.0 documents are read as drf-yasg output and
/// everything else as drf-spectacular output.
pub fn load_schema_file(
    kind: Option<BackendKind>,
    path: &Path,
) -> Result<ApiSchema, AcquireError> {
    let content = fs::read_to_string(path).map_err(|source| AcquireError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let value: serde_json::Value = match ext {
        "json" => serde_json::from_str(&content).map_err(|e| e.to_string()),
        _ => serde_yaml_ng::from_str(&content).map_err(|e| e.to_string()),
    }
    .map_err(|message| AcquireError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    let kind = kind.unwrap_or_else(|| {
        if value.get("swagger").is_some() {
            BackendKind::Yasg
        } else {
            BackendKind::Spectacular
        }
    });

    let schema = ApiSchema::from_value(kind, value).map_err(|e| AcquireError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    info!("Loaded {} schema from {}", kind, path.display());
    Ok(schema)
}
