// CounselDesk - app/journal.rs
//
// Recording a new counseling session.
//
// A session is validated against the roster, stamped with the local time,
// and handed to a `LogSink`. Only the local CSV source has a sink; with the
// spreadsheet source the tool is read-only and the caller shows the row as a
// preview instead.

use crate::core::model::{CounselLog, Location, Student, LOG_COLUMNS};
use crate::core::query;
use crate::util::constants::JOURNAL_TIMESTAMP_FORMAT;
use crate::util::error::JournalError;
use chrono::NaiveDateTime;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Session details entered by the counselor.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub student_name: String,
    pub location: String,
    pub content: String,
    /// Name of an attached recording, if any. Only the name is kept.
    pub audio_file_name: Option<String>,
}

/// Destination for new journal rows.
pub trait LogSink {
    /// Append one session.
    fn append(&mut self, log: &CounselLog) -> Result<(), JournalError>;

    /// Where rows go, for user messages.
    fn describe(&self) -> String;
}

/// Result of `record_session`.
#[derive(Debug)]
pub enum SaveOutcome {
    /// The row was written to the sink.
    Saved(CounselLog),
    /// No sink is available; the row was built but not stored.
    Preview(CounselLog),
}

/// Validate `session` against the roster and build the journal row.
pub fn build_log(
    students: &[Student],
    session: &NewSession,
    now: NaiveDateTime,
) -> Result<CounselLog, JournalError> {
    let name = session.student_name.trim();
    if name.is_empty() {
        return Err(JournalError::NoStudentSelected);
    }
    let student = query::find_student(students, name).ok_or_else(|| {
        JournalError::UnknownStudent {
            name: name.to_string(),
        }
    })?;
    let location = Location::from_label(&session.location).ok_or_else(|| {
        JournalError::InvalidLocation {
            location: session.location.clone(),
        }
    })?;

    let audio = session
        .audio_file_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| format!("(첨부 파일명: {n})"))
        .unwrap_or_default();

    let timestamp_raw = now.format(JOURNAL_TIMESTAMP_FORMAT).to_string();
    Ok(CounselLog {
        timestamp: Some(now),
        timestamp_raw,
        location: location.label().to_string(),
        grade: student.grade.clone(),
        class: student.class.clone(),
        number: student.number.clone(),
        name: student.name.clone(),
        content: session.content.trim().to_string(),
        audio,
    })
}

/// Build the row for `session` and store it if a sink is available.
pub fn record_session(
    students: &[Student],
    session: &NewSession,
    now: NaiveDateTime,
    sink: Option<&mut dyn LogSink>,
) -> Result<SaveOutcome, JournalError> {
    let log = build_log(students, session, now)?;
    match sink {
        Some(sink) => {
            sink.append(&log)?;
            tracing::info!(target_sink = %sink.describe(), "Session recorded");
            Ok(SaveOutcome::Saved(log))
        }
        None => {
            tracing::info!("Read-only source; session shown as preview only");
            Ok(SaveOutcome::Preview(log))
        }
    }
}

/// Appends rows to a local journal CSV file.
///
/// A missing or empty file gets the header row first. A file whose last line
/// lacks a newline gets one before the new row.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for CsvFileSink {
    fn append(&mut self, log: &CounselLog) -> Result<(), JournalError> {
        let io_err = |e| JournalError::Io {
            path: self.path.clone(),
            source: e,
        };

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(io_err)?;

        let len = file.metadata().map_err(io_err)?.len();
        let needs_header = len == 0;
        let needs_newline = if len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1)).map_err(io_err)?;
            file.read_exact(&mut last).map_err(io_err)?;
            last[0] != b'\n'
        } else {
            false
        };
        if needs_newline {
            file.write_all(b"\n").map_err(io_err)?;
        }

        let csv_err = |e| JournalError::Csv {
            path: self.path.clone(),
            source: e,
        };
        let mut writer = csv::Writer::from_writer(file);
        if needs_header {
            writer.write_record(LOG_COLUMNS).map_err(csv_err)?;
        }
        writer.write_record(log.to_row()).map_err(csv_err)?;
        writer.flush().map_err(io_err)?;

        tracing::debug!(path = %self.path.display(), "Journal row appended");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
