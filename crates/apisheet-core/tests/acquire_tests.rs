use std::cell::Cell;
use std::rc::Rc;

use apisheet_core::acquire::{self, BackendSelection, ManagePyBackend, SchemaBackend};
use apisheet_core::config::{ApisheetConfig, BackendChoice};
use apisheet_core::error::AcquireError;
use apisheet_core::schema::{ApiSchema, BackendKind, SchemaInfo};

const SPECTACULAR: &str = include_str!("fixtures/spectacular.json");
const YASG: &str = include_str!("fixtures/yasg.json");

/// Backend whose availability is fixed and whose probes are counted.
struct FakeBackend {
    kind: BackendKind,
    available: bool,
    probes: Rc<Cell<usize>>,
    seen_version: Rc<Cell<bool>>,
}

impl FakeBackend {
    fn new(kind: BackendKind, available: bool) -> Self {
        Self {
            kind,
            available,
            probes: Rc::new(Cell::new(0)),
            seen_version: Rc::new(Cell::new(false)),
        }
    }
}

impl SchemaBackend for FakeBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        self.probes.set(self.probes.get() + 1);
        self.available
    }

    fn generate(&self, info: &SchemaInfo) -> Result<ApiSchema, AcquireError> {
        self.seen_version.set(info.version == "v1");
        let document = match self.kind {
            BackendKind::Spectacular => SPECTACULAR,
            BackendKind::Yasg => YASG,
        };
        Ok(ApiSchema::from_json(self.kind, document).unwrap())
    }
}

fn boxed(backend: FakeBackend) -> Box<dyn SchemaBackend> {
    Box::new(backend)
}

#[test]
fn prefers_spectacular_when_both_available() {
    let spectacular = FakeBackend::new(BackendKind::Spectacular, true);
    let yasg = FakeBackend::new(BackendKind::Yasg, true);
    let yasg_probes = yasg.probes.clone();

    let selection = BackendSelection::detect(
        vec![boxed(spectacular), boxed(yasg)],
        SchemaInfo::default(),
    );
    assert_eq!(selection.selected(), Some(BackendKind::Spectacular));
    assert_eq!(yasg_probes.get(), 0, "later candidates are not probed");

    let schema = acquire::acquire_schema(&selection).unwrap();
    assert!(matches!(schema, ApiSchema::Spectacular(_)));
}

#[test]
fn falls_back_to_yasg() {
    let spectacular = FakeBackend::new(BackendKind::Spectacular, false);
    let yasg = FakeBackend::new(BackendKind::Yasg, true);
    let spectacular_probes = spectacular.probes.clone();
    let seen_version = yasg.seen_version.clone();

    let selection = BackendSelection::detect(
        vec![boxed(spectacular), boxed(yasg)],
        SchemaInfo::default(),
    );
    assert_eq!(selection.selected(), Some(BackendKind::Yasg));
    assert_eq!(spectacular_probes.get(), 1);

    let schema = acquire::acquire_schema(&selection).unwrap();
    assert_eq!(schema.kind(), BackendKind::Yasg);
    assert!(seen_version.get(), "yasg receives the schema info");
}

#[test]
fn selection_is_resolved_once() {
    let spectacular = FakeBackend::new(BackendKind::Spectacular, true);
    let probes = spectacular.probes.clone();

    let selection = BackendSelection::detect(vec![boxed(spectacular)], SchemaInfo::default());
    acquire::acquire_schema(&selection).unwrap();
    acquire::acquire_schema(&selection).unwrap();

    assert_eq!(probes.get(), 1);
}

#[test]
fn missing_backend_names_both_libraries() {
    let selection = BackendSelection::detect(
        vec![
            boxed(FakeBackend::new(BackendKind::Spectacular, false)),
            boxed(FakeBackend::new(BackendKind::Yasg, false)),
        ],
        SchemaInfo::default(),
    );
    assert_eq!(selection.selected(), None);

    let err = acquire::acquire_schema(&selection).unwrap_err();
    assert!(matches!(err, AcquireError::MissingBackend));
    let message = err.to_string();
    assert!(message.contains("drf-spectacular"));
    assert!(message.contains("drf-yasg"));
}

#[test]
fn missing_backend_writes_no_file() {
    let tmp = tempfile::tempdir().unwrap();
    let destination = tmp.path().join("api_documentation.xlsx");

    let selection = BackendSelection::detect(Vec::new(), SchemaInfo::default());
    let result = acquire::acquire_schema(&selection).map(|schema| {
        apisheet_core::export_to_table(&schema, &destination, &Default::default())
    });

    assert!(result.is_err());
    assert!(!destination.exists());
}

#[test]
fn forced_backend_is_not_probed() {
    let spectacular = FakeBackend::new(BackendKind::Spectacular, false);
    let probes = spectacular.probes.clone();

    let selection = BackendSelection::forced(boxed(spectacular), SchemaInfo::default());
    assert_eq!(selection.selected(), Some(BackendKind::Spectacular));
    assert!(acquire::acquire_schema(&selection).is_ok());
    assert_eq!(probes.get(), 0);
}

#[test]
fn manage_py_command_args() {
    let info = SchemaInfo {
        title: "Shop API".to_string(),
        version: "v2".to_string(),
    };

    let spectacular = ManagePyBackend::new(BackendKind::Spectacular, "python", "manage.py");
    assert_eq!(
        spectacular.command_args(&info),
        vec!["spectacular", "--format", "openapi-json"]
    );

    let yasg = ManagePyBackend::new(BackendKind::Yasg, "python", "manage.py");
    assert_eq!(
        yasg.command_args(&info),
        vec!["generate_swagger", "--format", "json", "--api-version", "v2", "-"]
    );
}

#[test]
fn manage_py_without_interpreter() {
    let backend = ManagePyBackend::new(
        BackendKind::Yasg,
        "/nonexistent/apisheet-python",
        "manage.py",
    );
    assert!(!backend.is_available());

    let err = backend.generate(&SchemaInfo::default()).unwrap_err();
    assert!(matches!(err, AcquireError::Spawn { .. }));
}

#[test]
fn load_json_file_detects_swagger() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("swagger.json");
    std::fs::write(&path, YASG).unwrap();

    let schema = acquire::load_schema_file(None, &path).unwrap();
    assert_eq!(schema.kind(), BackendKind::Yasg);

    let path = tmp.path().join("openapi.json");
    std::fs::write(&path, SPECTACULAR).unwrap();
    let schema = acquire::load_schema_file(None, &path).unwrap();
    assert_eq!(schema.kind(), BackendKind::Spectacular);
}

#[test]
fn load_yaml_file() {
    let path = std::path::Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/spectacular.yaml"
    ));
    let schema = acquire::load_schema_file(Some(BackendKind::Spectacular), path).unwrap();

    let ApiSchema::Spectacular(ref spectacular) = schema else {
        panic!("expected spectacular schema");
    };
    assert_eq!(spectacular.paths().len(), 1);
    assert_eq!(spectacular.openapi.as_deref(), Some("3.0.3"));
}

#[test]
fn load_file_errors() {
    let tmp = tempfile::tempdir().unwrap();

    let missing = tmp.path().join("missing.json");
    let err = acquire::load_schema_file(None, &missing).unwrap_err();
    assert!(matches!(err, AcquireError::Io { .. }));

    let broken = tmp.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    let err = acquire::load_schema_file(None, &broken).unwrap_err();
    assert!(matches!(err, AcquireError::Parse { .. }));
}

fn config_without_python(backend: BackendChoice) -> ApisheetConfig {
    ApisheetConfig {
        backend,
        python: "/nonexistent/apisheet-python".to_string(),
        info: SchemaInfo {
            title: "Shop API".to_string(),
            version: "v3".to_string(),
        },
        ..ApisheetConfig::default()
    }
}

#[test]
fn pinned_backend_from_config_skips_probing() {
    // An unavailable interpreter would be rejected if the pinned backend were probed.
    let selection = BackendSelection::from_config(&config_without_python(BackendChoice::Yasg));
    assert_eq!(selection.selected(), Some(BackendKind::Yasg));
    assert_eq!(selection.info().title, "Shop API");
    assert_eq!(selection.info().version, "v3");
}

#[test]
fn auto_backend_from_config_probes() {
    let selection = BackendSelection::from_config(&config_without_python(BackendChoice::Auto));
    assert_eq!(selection.selected(), None);
    assert!(matches!(
        acquire::acquire_schema(&selection),
        Err(AcquireError::MissingBackend)
    ));
}

#[test]
fn explicit_kind_overrides_detection() {
    let tmp = tempfile::tempdir().unwrap();

    let swagger = tmp.path().join("swagger.json");
    std::fs::write(&swagger, YASG).unwrap();
    let schema = acquire::load_schema_file(Some(BackendKind::Spectacular), &swagger).unwrap();
    assert_eq!(schema.kind(), BackendKind::Spectacular);

    let openapi = tmp.path().join("openapi.json");
    std::fs::write(&openapi, SPECTACULAR).unwrap();
    let schema = acquire::load_schema_file(Some(BackendKind::Yasg), &openapi).unwrap();
    assert_eq!(schema.kind(), BackendKind::Yasg);
}

#[test]
fn load_openapi_file_with_path_item_fields() {
    let path = std::path::Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/path-item-fields.json"
    ));
    let schema = acquire::load_schema_file(None, path).unwrap();
    assert_eq!(schema.kind(), BackendKind::Spectacular);
    assert_eq!(schema.operations().unwrap().len(), 2);
}
