pub mod acquire;
pub mod config;
pub mod error;
pub mod export;
pub mod schema;
pub mod table;

pub use acquire::{BackendSelection, SchemaBackend, acquire_schema};
pub use export::{ExportOptions, export_to_table};
pub use schema::{ApiSchema, BackendKind};
pub use table::{ApiRow, ApiTable, HEADER};
