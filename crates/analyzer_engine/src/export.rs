use std::path::Path;

use analyzer_core::{CellValue, SimilarityReport};
use analyzer_logging::analyzer_info;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::persist::{AtomicFileWriter, PersistError};
use crate::ExportSummary;

pub const DEFAULT_EXPORT_FILENAME: &str = "similarity_report.xlsx";
pub const DEFAULT_SHEET_NAME: &str = "Similarity Report";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_filename: String,
    pub sheet_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_filename: DEFAULT_EXPORT_FILENAME.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("report does not fit in a worksheet ({rows} rows, {columns} columns)")]
    TooLarge { rows: usize, columns: usize },
}

/// Serializes the report into an in-memory `.xlsx` workbook with one sheet:
/// a header row of column names, then one row per report row.
pub fn build_workbook(report: &SimilarityReport, sheet_name: &str) -> Result<Vec<u8>, ExportError> {
    let columns = report.columns();
    let too_large = || ExportError::TooLarge {
        rows: report.len(),
        columns: columns.len(),
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, name) in columns.iter().enumerate() {
        let col = u16::try_from(col).map_err(|_| too_large())?;
        worksheet.write_string(0, col, name)?;
    }

    for (index, row) in report.rows().iter().enumerate() {
        let sheet_row = u32::try_from(index + 1).map_err(|_| too_large())?;
        for (col, name) in columns.iter().enumerate() {
            let col = u16::try_from(col).map_err(|_| too_large())?;
            if let Some(value) = row.value(name) {
                write_cell(worksheet, sheet_row, col, &value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Builds the workbook and writes it to `{output_dir}/{options.output_filename}`.
pub fn export_report(
    output_dir: &Path,
    report: &SimilarityReport,
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let buffer = build_workbook(report, &options.sheet_name)?;
    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let output_path = writer.write(&options.output_filename, &buffer)?;

    analyzer_info!(
        "Exported {} row(s) to {:?} ({} bytes)",
        report.len(),
        output_path,
        buffer.len()
    );

    Ok(ExportSummary {
        row_count: report.len(),
        column_count: report.columns().len(),
        output_path,
    })
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
) -> Result<(), XlsxError> {
    match value {
        CellValue::Empty => {}
        CellValue::Bool(flag) => {
            worksheet.write_boolean(row, col, *flag)?;
        }
        CellValue::Number(number) => {
            worksheet.write_number(row, col, *number)?;
        }
        CellValue::Text(text) => {
            worksheet.write_string(row, col, text)?;
        }
    }
    Ok(())
}
