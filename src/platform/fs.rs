// CounselDesk - platform/fs.rs
//
// Small filesystem helpers shared by the local CSV source and the cache.

use std::io;
use std::path::Path;

/// Read the full content of a file as a string, refusing files larger than
/// `max_bytes`.
///
/// For files with invalid UTF-8, uses lossy conversion. Spreadsheet exports
/// saved by office tools sometimes carry stray bytes; a replacement character
/// is preferable to rejecting the whole table.
pub fn read_file_lossy(path: &Path, max_bytes: u64) -> io::Result<String> {
    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("file is {size} bytes, exceeds maximum of {max_bytes} bytes"),
        ));
    }
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write `contents` to `path` atomically (write temp, then rename).
///
/// Creates all parent directories as needed. A crash between write and
/// rename loses the new content but never corrupts the previous file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp_name);

    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path).map_err(|e| {
        // Clean up the temp file on failure; ignore any secondary error.
        let _ = std::fs::remove_file(&tmp);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_file_lossy_replaces_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.csv");
        std::fs::write(&path, b"name\n\xffok\n").unwrap();
        let text = read_file_lossy(&path, 1024).unwrap();
        assert!(text.contains("\u{fffd}ok"));
    }

    #[test]
    fn test_read_file_lossy_enforces_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.csv");
        std::fs::write(&path, vec![b'a'; 100]).unwrap();
        let err = read_file_lossy(&path, 10).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_write_atomic_creates_parents_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cache.csv");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert!(!dir.path().join("nested").join("cache.csv.tmp").exists());
    }
}
