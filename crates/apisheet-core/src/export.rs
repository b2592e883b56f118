use std::path::Path;

use log::info;
use rust_xlsxwriter::{DocProperties, Format, Workbook};

use crate::config::DEFAULT_SHEET_NAME;
use crate::error::ExportError;
use crate::schema::ApiSchema;
use crate::table::{ApiTable, HEADER};

/// Rows per worksheet supported by the xlsx format, header included.
pub const MAX_ROWS: usize = 1_048_576;

/// Options for writing the spreadsheet.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub sheet_name: String,
    /// Stored as the workbook's document title.
    pub title: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            title: None,
        }
    }
}

/// Flatten `schema` and write it to `destination`, replacing any existing file.
pub fn export_to_table(
    schema: &ApiSchema,
    destination: &Path,
    options: &ExportOptions,
) -> Result<ApiTable, ExportError> {
    let table = ApiTable::from_schema(&options.sheet_name, schema)?;

    let mut workbook = build_workbook(&table, options.title.as_deref())?;
    workbook.save(destination)?;

    info!(
        "Export complete: '{}' ({} operations)",
        destination.display(),
        table.rows.len()
    );
    Ok(table)
}

/// Check that `rows` data rows plus the header fit one worksheet.
fn ensure_fits(rows: usize) -> Result<(), ExportError> {
    if rows >= MAX_ROWS {
        return Err(ExportError::TooManyRows(rows));
    }
    Ok(())
}

/// Lay out `table` as a single-sheet workbook.
pub fn build_workbook(table: &ApiTable, title: Option<&str>) -> Result<Workbook, ExportError> {
    ensure_fits(table.rows.len())?;

    let mut workbook = Workbook::new();
    if let Some(title) = title {
        workbook.set_properties(&DocProperties::new().set_title(title));
    }

    let header_format = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(&table.sheet_name)?;

    for (col, name) in (0u16..).zip(HEADER) {
        sheet.write_string_with_format(0, col, name, &header_format)?;
    }

    for (row, api_row) in (1u32..).zip(&table.rows) {
        for (col, value) in (0u16..).zip(api_row.cells()) {
            // Blank cells stay unwritten.
            if !value.is_empty() {
                sheet.write_string(row, col, value)?;
            }
        }
    }

    sheet.set_freeze_panes(1, 0)?;
    sheet.autofit();

    Ok(workbook)
}
