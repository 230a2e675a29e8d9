// CounselDesk - app/source.rs
//
// Where the three tables come from: a published Google Sheet (one CSV export
// URL per tab) or a directory of local CSV files.
//
// Sheet fetches use a short retry loop: HTTP status failures are retried once
// after a brief pause; transport errors fail immediately. Successful fetches
// go through the on-disk cache.

use crate::app::cache::SheetCache;
use crate::core::model::Dataset;
use crate::core::table;
use crate::platform::config::{AppConfig, SheetIds};
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::{Result, SourceError};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One of the three spreadsheet tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Students,
    Logs,
    Scholarships,
}

impl TableKind {
    pub fn all() -> &'static [TableKind] {
        &[TableKind::Students, TableKind::Logs, TableKind::Scholarships]
    }

    /// Human-readable label for messages.
    pub fn label(&self) -> &'static str {
        match self {
            TableKind::Students => "학생명단",
            TableKind::Logs => "상담일지",
            TableKind::Scholarships => "장학금 지원",
        }
    }

    /// Tab gid of this table within the spreadsheet.
    pub fn gid<'a>(&self, ids: &'a SheetIds) -> &'a str {
        match self {
            TableKind::Students => &ids.gid_students,
            TableKind::Logs => &ids.gid_logs,
            TableKind::Scholarships => &ids.gid_scholarships,
        }
    }

    /// File name of this table in a local data directory.
    pub fn local_file(&self) -> &'static str {
        match self {
            TableKind::Students => constants::LOCAL_STUDENTS_FILE,
            TableKind::Logs => constants::LOCAL_LOGS_FILE,
            TableKind::Scholarships => constants::LOCAL_SCHOLARSHIPS_FILE,
        }
    }
}

/// Where the dashboard reads its tables from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Published spreadsheet, read through its CSV export.
    Sheet(SheetIds),

    /// Directory with students.csv, logs.csv and scholarships.csv.
    Local { dir: PathBuf },
}

impl DataSource {
    /// Pick the source: CLI directory > config local_dir > spreadsheet.
    pub fn from_config(config: &AppConfig, dir_override: Option<&Path>) -> Self {
        match dir_override.or(config.local_dir.as_deref()) {
            Some(dir) => DataSource::Local {
                dir: dir.to_path_buf(),
            },
            None => DataSource::Sheet(config.sheet.clone()),
        }
    }

    /// Whether new sessions can be written back to this source.
    pub fn is_writable(&self) -> bool {
        matches!(self, DataSource::Local { .. })
    }

    /// Short description for settings output and logs.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Sheet(ids) => format!("Google Sheet {}", ids.spreadsheet_id),
            DataSource::Local { dir } => format!("local CSV files in {}", dir.display()),
        }
    }
}

/// CSV export URL of one spreadsheet tab.
pub fn csv_url(spreadsheet_id: &str, gid: &str) -> String {
    format!(
        "{}{spreadsheet_id}{}{gid}",
        constants::SHEET_EXPORT_PREFIX,
        constants::SHEET_EXPORT_SUFFIX
    )
}

/// Checklist shown when the spreadsheet cannot be loaded.
pub fn sheet_troubleshooting(ids: &SheetIds) -> String {
    format!(
        "Please check:\n\
         1) The spreadsheet is shared as 'Anyone with the link can view'.\n\
         2) Each tab gid is correct (students {}, journal {}, scholarships {}).\n\
         3) Export URLs have the form {}",
        ids.gid_students,
        ids.gid_logs,
        ids.gid_scholarships,
        csv_url(&ids.spreadsheet_id, "<GID>")
    )
}

/// Run `fetch` up to `attempts` times, pausing `delay` between attempts.
///
/// Only `SourceError::HttpStatus` is retried; any other error is returned at
/// once. After the last attempt the last error is returned.
pub fn fetch_with_retry<F>(attempts: u32, delay: Duration, mut fetch: F) -> std::result::Result<String, SourceError>
where
    F: FnMut() -> std::result::Result<String, SourceError>,
{
    let mut attempt = 1;
    loop {
        match fetch() {
            Ok(body) => return Ok(body),
            Err(e @ SourceError::HttpStatus { .. }) if attempt < attempts => {
                tracing::warn!(attempt, error = %e, "Fetch failed, retrying");
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Heuristic for the sign-in page served for sheets that are not public.
fn looks_like_html(body: &str) -> bool {
    let head = body.trim_start().get(..15).unwrap_or(body.trim_start());
    let head = head.to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

/// Blocking HTTP fetcher for sheet exports.
pub struct SheetFetcher {
    client: reqwest::blocking::Client,
}

impl SheetFetcher {
    pub fn new() -> std::result::Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(constants::FETCH_TIMEOUT_SECS))
            .user_agent(concat!("counseldesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Http {
                url: String::new(),
                source: e,
            })?;
        Ok(Self { client })
    }

    /// Single GET of `url`, mapping failures to `SourceError`.
    fn get_once(&self, url: &str) -> std::result::Result<String, SourceError> {
        let http_err = |e| SourceError::Http {
            url: url.to_string(),
            source: e,
        };

        let response = self.client.get(url).send().map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(http_err)?;
        if body.len() as u64 > constants::MAX_TABLE_BYTES {
            return Err(SourceError::TooLarge {
                origin: url.to_string(),
                size: body.len() as u64,
                max_size: constants::MAX_TABLE_BYTES,
            });
        }
        if looks_like_html(&body) {
            return Err(SourceError::NotCsv {
                url: url.to_string(),
            });
        }
        Ok(body)
    }

    /// Fetch one tab with retry.
    pub fn fetch(&self, url: &str) -> std::result::Result<String, SourceError> {
        fetch_with_retry(
            constants::FETCH_ATTEMPTS,
            Duration::from_millis(constants::FETCH_RETRY_DELAY_MS),
            || self.get_once(url),
        )
    }
}

/// Read one table's CSV text from `source`.
fn read_table_text(
    source: &DataSource,
    kind: TableKind,
    fetcher: Option<&SheetFetcher>,
    cache: Option<&SheetCache>,
) -> std::result::Result<String, SourceError> {
    match source {
        DataSource::Local { dir } => {
            let path = dir.join(kind.local_file());
            match fs::read_file_lossy(&path, constants::MAX_TABLE_BYTES) {
                Ok(text) => Ok(text),
                // A journal that was never written is an empty journal.
                Err(e) if kind == TableKind::Logs && e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::info!(path = %path.display(), "No journal file yet; starting empty");
                    Ok(String::new())
                }
                Err(e) => Err(SourceError::Io { path, source: e }),
            }
        }
        DataSource::Sheet(ids) => {
            let gid = kind.gid(ids);
            if let Some(body) = cache.and_then(|c| c.get(&ids.spreadsheet_id, gid)) {
                return Ok(body);
            }

            let url = csv_url(&ids.spreadsheet_id, gid);
            tracing::info!(table = kind.label(), gid, "Fetching sheet export");
            let body = match fetcher {
                Some(f) => f.fetch(&url)?,
                None => SheetFetcher::new()?.fetch(&url)?,
            };
            if let Some(c) = cache {
                c.put(&ids.spreadsheet_id, gid, &body);
            }
            Ok(body)
        }
    }
}

/// Load and decode all three tables.
pub fn load_dataset(source: &DataSource, cache: Option<&SheetCache>) -> Result<Dataset> {
    tracing::info!(source = %source.describe(), "Loading data");

    let fetcher = match source {
        DataSource::Sheet(_) => Some(SheetFetcher::new()?),
        DataSource::Local { .. } => None,
    };
    let read = |kind| read_table_text(source, kind, fetcher.as_ref(), cache);

    let (students, roster_warning) = table::parse_students(&read(TableKind::Students)?)?;
    let logs = table::parse_logs(&read(TableKind::Logs)?)?;
    let scholarships = table::parse_scholarships(&read(TableKind::Scholarships)?)?;

    tracing::info!(
        students = students.len(),
        logs = logs.len(),
        scholarships = scholarships.len(),
        "Data loaded"
    );

    Ok(Dataset {
        students,
        logs,
        scholarships,
        warnings: roster_warning.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn status_err() -> SourceError {
        SourceError::HttpStatus {
            url: "u".to_string(),
            status: 503,
        }
    }

    #[test]
    fn test_csv_url() {
        assert_eq!(
            csv_url("abc", "0"),
            "https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=0"
        );
    }

    #[test]
    fn test_retry_recovers_after_status_error() {
        let calls = Cell::new(0);
        let result = fetch_with_retry(2, Duration::ZERO, || {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(status_err())
            } else {
                Ok("body".to_string())
            }
        });
        assert_eq!(result.unwrap(), "body");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_retry_gives_up_after_last_attempt() {
        let calls = Cell::new(0);
        let result = fetch_with_retry(2, Duration::ZERO, || {
            calls.set(calls.get() + 1);
            Err(status_err())
        });
        assert!(matches!(result, Err(SourceError::HttpStatus { status: 503, .. })));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_non_status_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result = fetch_with_retry(2, Duration::ZERO, || {
            calls.set(calls.get() + 1);
            Err(SourceError::NotCsv {
                url: "u".to_string(),
            })
        });
        assert!(matches!(result, Err(SourceError::NotCsv { .. })));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<!DOCTYPE html><html>"));
        assert!(looks_like_html("  <html lang=ko>"));
        assert!(!looks_like_html("이름,학년\n"));
        assert!(!looks_like_html(""));
    }

    #[test]
    fn test_source_selection() {
        let config = AppConfig::default();
        assert!(matches!(
            DataSource::from_config(&config, None),
            DataSource::Sheet(_)
        ));

        let local = DataSource::from_config(&config, Some(Path::new("/data")));
        assert!(local.is_writable());

        let mut config = AppConfig::default();
        config.local_dir = Some(PathBuf::from("/cfg"));
        assert_eq!(
            DataSource::from_config(&config, Some(Path::new("/cli"))),
            DataSource::Local {
                dir: PathBuf::from("/cli")
            }
        );
        assert!(!DataSource::Sheet(SheetIds::default()).is_writable());
    }

    #[test]
    fn test_local_missing_journal_is_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("students.csv"), "학년,반,번호,이름\n1,1,1,가람\n").unwrap();
        std::fs::write(dir.path().join("scholarships.csv"), "장학명,지원 금액(범위)\nA,연 100만원\n").unwrap();

        let source = DataSource::Local {
            dir: dir.path().to_path_buf(),
        };
        let data = load_dataset(&source, None).unwrap();
        assert_eq!(data.students.len(), 1);
        assert!(data.logs.is_empty());
        assert_eq!(data.scholarships[0].max_amount, 100);
        assert!(data.warnings.is_empty());
    }

    #[test]
    fn test_local_missing_roster_is_error() {
        let dir = TempDir::new().unwrap();
        let source = DataSource::Local {
            dir: dir.path().to_path_buf(),
        };
        let err = load_dataset(&source, None).unwrap_err();
        assert!(err.to_string().contains("students.csv"), "{err}");
    }

    #[test]
    fn test_sheet_source_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let cache = SheetCache::new(dir.path(), 600);
        let ids = SheetIds::default();
        cache.put(&ids.spreadsheet_id, &ids.gid_students, "학년,반,번호,이름\n2,3,4,나래\n");
        cache.put(&ids.spreadsheet_id, &ids.gid_logs, "타임스탬프,이름,상담내용\n");
        cache.put(&ids.spreadsheet_id, &ids.gid_scholarships, "장학명,지원 금액(범위)\nB,월 10만원\n");

        let data = load_dataset(&DataSource::Sheet(ids), Some(&cache)).unwrap();
        assert_eq!(data.students[0].name, "나래");
        assert_eq!(data.scholarships[0].max_amount, 120);
    }
}
