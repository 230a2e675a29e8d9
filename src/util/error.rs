// CounselDesk - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.
//
// The keyword and amount functions in `core` are total and never appear here.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all CounselDesk operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum CounselDeskError {
    /// Fetching or reading a data table failed.
    Source(SourceError),

    /// A fetched table could not be decoded.
    Table(TableError),

    /// Recording a counseling session failed.
    Journal(JournalError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// A command-line argument was rejected.
    InvalidArgument { name: &'static str, reason: String },
}

impl fmt::Display for CounselDeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(e) => write!(f, "Data source error: {e}"),
            Self::Table(e) => write!(f, "Table error: {e}"),
            Self::Journal(e) => write!(f, "Journal error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::InvalidArgument { name, reason } => {
                write!(f, "Invalid argument '{name}': {reason}")
            }
        }
    }
}

impl std::error::Error for CounselDeskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(e) => Some(e),
            Self::Table(e) => Some(e),
            Self::Journal(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::InvalidArgument { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Source errors
// ---------------------------------------------------------------------------

/// Errors related to fetching a table from a spreadsheet export or disk.
#[derive(Debug)]
pub enum SourceError {
    /// The HTTP request could not be sent or its body could not be read.
    Http { url: String, source: reqwest::Error },

    /// The server answered with a non-success status.
    HttpStatus { url: String, status: u16 },

    /// The server answered with an HTML page instead of CSV, which is what a
    /// spreadsheet that is not shared publicly returns.
    NotCsv { url: String },

    /// The table exceeds the maximum accepted size.
    TooLarge {
        origin: String,
        size: u64,
        max_size: u64,
    },

    /// I/O error reading a local CSV file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { url, source } => write!(f, "Request to '{url}' failed: {source}"),
            Self::HttpStatus { url, status } => {
                write!(f, "Request to '{url}' returned HTTP {status}")
            }
            Self::NotCsv { url } => write!(
                f,
                "'{url}' returned a web page instead of CSV; is the sheet shared for viewing?"
            ),
            Self::TooLarge {
                origin,
                size,
                max_size,
            } => write!(
                f,
                "Table '{origin}' is {size} bytes, exceeds maximum of {max_size} bytes"
            ),
            Self::Io { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<SourceError> for CounselDeskError {
    fn from(e: SourceError) -> Self {
        Self::Source(e)
    }
}

// ---------------------------------------------------------------------------
// Table errors
// ---------------------------------------------------------------------------

/// Errors related to decoding CSV tables.
#[derive(Debug)]
pub enum TableError {
    /// The CSV text is malformed (bad quoting, invalid header row, ...).
    Csv {
        table: &'static str,
        source: csv::Error,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv { table, source } => write!(f, "Cannot decode {table} table: {source}"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source, .. } => Some(source),
        }
    }
}

impl From<TableError> for CounselDeskError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

// ---------------------------------------------------------------------------
// Journal errors
// ---------------------------------------------------------------------------

/// Errors related to recording a counseling session.
#[derive(Debug)]
pub enum JournalError {
    /// No student name was given.
    NoStudentSelected,

    /// The name is not on the student roster.
    UnknownStudent { name: String },

    /// The location is not one of the accepted counseling rooms.
    InvalidLocation { location: String },

    /// CSV serialisation of the new row failed.
    Csv { path: PathBuf, source: csv::Error },

    /// I/O error appending to the journal file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for JournalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStudentSelected => write!(f, "No student selected"),
            Self::UnknownStudent { name } => {
                write!(f, "Student '{name}' is not on the roster")
            }
            Self::InvalidLocation { location } => write!(
                f,
                "Location '{location}' is not recognised. Expected one of: {}",
                crate::util::constants::LOCATIONS.join(", ")
            ),
            Self::Csv { path, source } => {
                write!(f, "Cannot write journal row to '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Journal I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for JournalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<JournalError> for CounselDeskError {
    fn from(e: JournalError) -> Self {
        Self::Journal(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The export path has no recognised extension.
    UnknownFormat { path: PathBuf },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::UnknownFormat { path } => write!(
                f,
                "Cannot infer export format from '{}'. Use a .csv or .json extension.",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::UnknownFormat { .. } => None,
        }
    }
}

impl From<ExportError> for CounselDeskError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for CounselDeskError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for CounselDesk results.
pub type Result<T> = std::result::Result<T, CounselDeskError>;
