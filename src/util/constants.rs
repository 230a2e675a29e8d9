// CounselDesk - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "CounselDesk";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "CounselDesk";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Spreadsheet source
// =============================================================================

/// Default published spreadsheet ID.
pub const DEFAULT_SPREADSHEET_ID: &str = "1QQvBxuB1v8au2e7u22XzhZ9ov-SSQReutDGMKS31gvQ";

/// Default tab gid of the student roster (학생명단).
pub const DEFAULT_GID_STUDENTS: &str = "1030356842";

/// Default tab gid of the counseling journal (상담일지).
pub const DEFAULT_GID_LOGS: &str = "0";

/// Default tab gid of the scholarship list (장학금 지원).
pub const DEFAULT_GID_SCHOLARSHIPS: &str = "1878696825";

/// CSV export URL prefix; the spreadsheet ID is inserted between prefix and
/// suffix, the tab gid is appended after the suffix.
pub const SHEET_EXPORT_PREFIX: &str = "https://docs.google.com/spreadsheets/d/";

/// CSV export URL suffix (see `SHEET_EXPORT_PREFIX`).
pub const SHEET_EXPORT_SUFFIX: &str = "/export?format=csv&gid=";

/// Number of fetch attempts per tab. Only HTTP status failures are retried.
pub const FETCH_ATTEMPTS: u32 = 2;

/// Pause between fetch attempts (ms).
pub const FETCH_RETRY_DELAY_MS: u64 = 600;

/// Per-request HTTP timeout (seconds).
pub const FETCH_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Local CSV source
// =============================================================================

/// Student roster file name inside a local data directory.
pub const LOCAL_STUDENTS_FILE: &str = "students.csv";

/// Counseling journal file name inside a local data directory.
pub const LOCAL_LOGS_FILE: &str = "logs.csv";

/// Scholarship list file name inside a local data directory.
pub const LOCAL_SCHOLARSHIPS_FILE: &str = "scholarships.csv";

/// Maximum size of a single CSV table read from disk or network (bytes).
pub const MAX_TABLE_BYTES: u64 = 32 * 1024 * 1024; // 32 MB

// =============================================================================
// Response cache
// =============================================================================

/// Default lifetime of a cached sheet export (seconds).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

/// Maximum user-configurable cache lifetime (seconds).
pub const MAX_CACHE_TTL_SECS: u64 = 86_400; // 24 h

/// Cache subdirectory name inside the platform data directory.
pub const CACHE_DIR_NAME: &str = "cache";

// =============================================================================
// Keyword extraction
// =============================================================================

/// Minimum token length in characters, before and after particle stripping.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Keywords shown as chips on a student's history.
pub const DEFAULT_HISTORY_TOP_K: usize = 15;

/// Keywords extracted for the monthly summary.
pub const DEFAULT_SUMMARY_TOP_K: usize = 50;

/// Keywords drawn in the monthly summary bar chart.
pub const SUMMARY_CHART_ITEMS: usize = 20;

/// Keywords shown as chips in the monthly summary.
pub const SUMMARY_CHIP_ITEMS: usize = 15;

/// Upper bound for user-configurable top-K values.
pub const MAX_TOP_K: usize = 500;

/// Bar chart width in terminal cells for the largest count.
pub const BAR_CHART_WIDTH: usize = 40;

// =============================================================================
// Scholarships
// =============================================================================

/// Largest accepted minimum-amount threshold (만원 per year).
pub const MAX_MIN_AMOUNT: u64 = 1_000;

// =============================================================================
// Journal
// =============================================================================

/// Timestamp layout used when recording a new session.
pub const JOURNAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Counseling locations offered when recording a session.
pub const LOCATIONS: &[&str] = &["교무실", "상담실1", "상담실2"];

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
