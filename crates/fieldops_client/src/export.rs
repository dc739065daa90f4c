use std::io;
use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Offset, Utc};
use fieldops_core::FailureKind;
use fieldops_logging::ops_info;

use crate::persist::{write_atomic, PersistError};
use crate::WorkAssignment;

pub const EXPORT_FILENAME: &str = "work_report.csv";

pub const CSV_HEADERS: [&str; 11] = [
    "Date",
    "Assignor",
    "Employee Name",
    "Client Name",
    "Activity",
    "Site ID",
    "PM Site ID",
    "PM Remarks",
    "Latitude",
    "Longitude",
    "Remarks",
];

/// dd-MM-yyyy hh:mm a
const DATE_FORMAT: &str = "%d-%m-%Y %I:%M %p";
const MISSING_DATE: &str = "--";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub filename: String,
    /// Offset the `Date` column is rendered in.
    pub utc_offset: FixedOffset,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            filename: EXPORT_FILENAME.to_string(),
            utc_offset: Utc.fix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub row_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No data available to export.")]
    Empty,
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

impl ExportError {
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            ExportError::Empty => Some(FailureKind::EmptyExport),
            _ => None,
        }
    }
}

/// Serializes the loaded page of work rows. Only the rows passed in are
/// exported; the rest of the filtered result set stays on the server.
pub fn export_work_report(
    rows: &[WorkAssignment],
    options: &ExportOptions,
) -> Result<CsvExport, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;
    for row in rows {
        writer.write_record(project(row, options.utc_offset))?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;

    Ok(CsvExport {
        filename: options.filename.clone(),
        bytes,
        row_count: rows.len(),
    })
}

/// Hands the blob to disk under its own file name.
pub fn save_export(dir: &Path, export: &CsvExport) -> Result<PathBuf, ExportError> {
    let path = dir.join(&export.filename);
    write_atomic(&path, &export.bytes)?;
    ops_info!("Exported {} rows to {:?}", export.row_count, path);
    Ok(path)
}

fn project(row: &WorkAssignment, offset: FixedOffset) -> [String; 11] {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let date = row
        .created_at
        .map(|at| at.with_timezone(&offset).format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| MISSING_DATE.to_string());

    [
        date,
        row.assignor_name().unwrap_or_default().to_string(),
        text(&row.name),
        text(&row.client_name),
        text(&row.activity),
        text(&row.site_id),
        text(&row.pm_site_id),
        text(&row.pm_comments),
        text(&row.latitude),
        text(&row.longitude),
        text(&row.remarks),
    ]
}
