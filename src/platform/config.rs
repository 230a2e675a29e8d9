// CounselDesk - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for CounselDesk data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/counseldesk/ or %APPDATA%\CounselDesk\)
    pub config_dir: PathBuf,

    /// Data directory for the response cache.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Path of the default config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }

    /// Directory holding cached sheet exports.
    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join(constants::CACHE_DIR_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[source]` section.
    pub source: SourceSection,
    /// `[cache]` section.
    pub cache: CacheSection,
    /// `[keywords]` section.
    pub keywords: KeywordsSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[source]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SourceSection {
    /// Published spreadsheet ID.
    pub spreadsheet_id: Option<String>,
    /// Tab gid of the student roster.
    pub gid_students: Option<String>,
    /// Tab gid of the counseling journal.
    pub gid_logs: Option<String>,
    /// Tab gid of the scholarship list.
    pub gid_scholarships: Option<String>,
    /// Directory with students.csv / logs.csv / scholarships.csv. When set,
    /// local files are used instead of the spreadsheet.
    pub local_dir: Option<String>,
}

/// `[cache]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Lifetime of a cached sheet export in seconds (0 disables the cache).
    pub ttl_seconds: Option<u64>,
}

/// `[keywords]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct KeywordsSection {
    /// Keyword chips shown on a student's history.
    pub history_top_k: Option<usize>,
    /// Keywords extracted for the monthly summary.
    pub summary_top_k: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Spreadsheet identity: one ID and a gid per tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetIds {
    pub spreadsheet_id: String,
    pub gid_students: String,
    pub gid_logs: String,
    pub gid_scholarships: String,
}

impl Default for SheetIds {
    fn default() -> Self {
        Self {
            spreadsheet_id: constants::DEFAULT_SPREADSHEET_ID.to_string(),
            gid_students: constants::DEFAULT_GID_STUDENTS.to_string(),
            gid_logs: constants::DEFAULT_GID_LOGS.to_string(),
            gid_scholarships: constants::DEFAULT_GID_SCHOLARSHIPS.to_string(),
        }
    }
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Source --
    pub sheet: SheetIds,
    /// Local CSV directory; overrides the spreadsheet when set.
    pub local_dir: Option<PathBuf>,

    // -- Cache --
    pub cache_ttl_secs: u64,

    // -- Keywords --
    pub history_top_k: usize,
    pub summary_top_k: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sheet: SheetIds::default(),
            local_dir: None,
            cache_ttl_secs: constants::DEFAULT_CACHE_TTL_SECS,
            history_top_k: constants::DEFAULT_HISTORY_TOP_K,
            summary_top_k: constants::DEFAULT_SUMMARY_TOP_K,
            log_level: None,
        }
    }
}

/// Read and parse a config file.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_raw_config(path: &Path) -> Result<Option<RawConfig>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    toml::from_str(&content)
        .map(Some)
        .map_err(|e| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Load and validate config.toml at `config_path`, never failing.
///
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults plus a warning, so the tool still
/// starts but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    match read_raw_config(config_path) {
        Ok(Some(raw)) => {
            tracing::info!(path = %config_path.display(), "Loaded config.toml");
            validate(raw)
        }
        Ok(None) => {
            tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
            (AppConfig::default(), Vec::new())
        }
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Validate an explicitly requested config file; a missing or broken file is
/// an error rather than a warning.
pub fn load_config_strict(config_path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    match read_raw_config(config_path)? {
        Some(raw) => Ok(validate(raw)),
        None => Err(ConfigError::Io {
            path: config_path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }),
    }
}

fn out_of_range(field: &str, value: impl ToString, expected: String) -> String {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
    .to_string()
}

/// Validate each field against named constants, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- Source: spreadsheet identity --
    let ids = [
        ("source.spreadsheet_id", raw.source.spreadsheet_id, &mut config.sheet.spreadsheet_id),
        ("source.gid_students", raw.source.gid_students, &mut config.sheet.gid_students),
        ("source.gid_logs", raw.source.gid_logs, &mut config.sheet.gid_logs),
        (
            "source.gid_scholarships",
            raw.source.gid_scholarships,
            &mut config.sheet.gid_scholarships,
        ),
    ];
    for (field, value, slot) in ids {
        let Some(value) = value else { continue };
        let value = value.trim().to_string();
        let valid = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            *slot = value;
        } else {
            warnings.push(out_of_range(
                field,
                &value,
                "a non-empty ID of letters, digits, '-' or '_'".to_string(),
            ));
        }
    }

    // -- Source: local_dir --
    if let Some(ref dir) = raw.source.local_dir {
        if !dir.trim().is_empty() {
            config.local_dir = Some(PathBuf::from(dir.trim()));
        }
    }

    // -- Cache: ttl_seconds --
    if let Some(ttl) = raw.cache.ttl_seconds {
        if ttl <= constants::MAX_CACHE_TTL_SECS {
            config.cache_ttl_secs = ttl;
        } else {
            warnings.push(out_of_range(
                "cache.ttl_seconds",
                ttl,
                format!("0-{}", constants::MAX_CACHE_TTL_SECS),
            ));
        }
    }

    // -- Keywords: top-K values --
    let top_ks = [
        ("keywords.history_top_k", raw.keywords.history_top_k, &mut config.history_top_k),
        ("keywords.summary_top_k", raw.keywords.summary_top_k, &mut config.summary_top_k),
    ];
    for (field, value, slot) in top_ks {
        let Some(k) = value else { continue };
        if (1..=constants::MAX_TOP_K).contains(&k) {
            *slot = k;
        } else {
            warnings.push(out_of_range(field, k, format!("1-{}", constants::MAX_TOP_K)));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}
