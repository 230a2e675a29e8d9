// CounselDesk - core/export.rs
//
// CSV and JSON export of session history and filtered scholarship lists.
// Core layer: writes to any Write trait object.

use crate::core::model::{CounselLog, Scholarship, LOG_COLUMNS, SCHOLARSHIP_DISPLAY_COLUMNS};
use crate::util::error::ExportError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Output format of an export, chosen from the target file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Infer the format from `path`'s extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("json") => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnknownFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Write rows as CSV under the given header, returning the row count.
fn write_csv<W, R, I>(
    header: &[&str],
    rows: I,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError>
where
    W: Write,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
    I: IntoIterator<Item = R>,
{
    let csv_err = |e| ExportError::Csv {
        path: PathBuf::from(export_path),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(header).map_err(csv_err)?;

    let mut count = 0;
    for row in rows {
        csv_writer.write_record(row).map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export counseling sessions to CSV in journal column order.
pub fn export_logs_csv<W: Write>(
    logs: &[&CounselLog],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    write_csv(LOG_COLUMNS, logs.iter().map(|l| l.to_row()), writer, export_path)
}

/// Export scholarships to CSV with the displayed columns plus `maxAmount`.
pub fn export_scholarships_csv<W: Write>(
    list: &[&Scholarship],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    write_csv(
        SCHOLARSHIP_DISPLAY_COLUMNS,
        list.iter().map(|s| s.to_row()),
        writer,
        export_path,
    )
}

/// Export any serialisable records as a pretty JSON array.
pub fn export_json<W: Write, T: serde::Serialize>(
    items: &[T],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, items).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(items.len())
}
