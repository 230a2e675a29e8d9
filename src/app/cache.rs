// CounselDesk - app/cache.rs
//
// On-disk cache of fetched sheet exports, so repeated commands within a few
// minutes do not refetch every tab.
//
// Design:
// - One file per (spreadsheet, gid) pair under the platform data directory.
// - Freshness is the file's modification time against a TTL; a TTL of 0
//   disables the cache entirely.
// - Writes are atomic (temp file then rename). Read or write failures are
//   logged and treated as a cache miss; the cache never fails a command.

use crate::platform::fs;
use crate::util::constants::MAX_TABLE_BYTES;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Time-limited cache of CSV bodies keyed by spreadsheet ID and tab gid.
#[derive(Debug, Clone)]
pub struct SheetCache {
    dir: PathBuf,
    ttl: Duration,
}

impl SheetCache {
    pub fn new(dir: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            dir: dir.into(),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, spreadsheet_id: &str, gid: &str) -> PathBuf {
        self.dir.join(format!("{spreadsheet_id}_{gid}.csv"))
    }

    /// Return the cached body if present and younger than the TTL.
    pub fn get(&self, spreadsheet_id: &str, gid: &str) -> Option<String> {
        if self.ttl.is_zero() {
            return None;
        }
        let path = self.entry_path(spreadsheet_id, gid);

        let modified = std::fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        // A modification time in the future counts as fresh.
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age >= self.ttl {
            tracing::debug!(gid, age_secs = age.as_secs(), "Cache entry expired");
            return None;
        }

        match fs::read_file_lossy(&path, MAX_TABLE_BYTES) {
            Ok(body) => {
                tracing::debug!(gid, age_secs = age.as_secs(), "Cache hit");
                Some(body)
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Cannot read cache entry");
                None
            }
        }
    }

    /// Store a fetched body. Failures are logged, never returned.
    pub fn put(&self, spreadsheet_id: &str, gid: &str, body: &str) {
        if self.ttl.is_zero() {
            return;
        }
        let path = self.entry_path(spreadsheet_id, gid);
        match fs::write_atomic(&path, body.as_bytes()) {
            Ok(()) => tracing::debug!(path = %path.display(), "Cache entry written"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Cannot write cache entry"),
        }
    }

    /// Remove every cached entry, e.g. after a write-back changed the sheet.
    pub fn clear(&self) {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(dir = %self.dir.display(), error = %e, "Cannot list cache");
                }
                return;
            }
        };

        let mut removed = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("csv")
                && std::fs::remove_file(&path).is_ok()
            {
                removed += 1;
            }
        }
        tracing::debug!(removed, "Cache cleared");
    }
}
