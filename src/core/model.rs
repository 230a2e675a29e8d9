// CounselDesk - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no platform
// dependencies.
//
// These types are the shared vocabulary across all layers. Column names are
// the Korean headers used by the counseling spreadsheet.

use chrono::NaiveDateTime;
use serde::Serialize;

// =============================================================================
// Column headers
// =============================================================================

pub const COL_TIMESTAMP: &str = "타임스탬프";
pub const COL_LOCATION: &str = "장소";
pub const COL_GRADE: &str = "학년";
pub const COL_CLASS: &str = "반";
pub const COL_NUMBER: &str = "번호";
pub const COL_NAME: &str = "이름";
pub const COL_CONTENT: &str = "상담내용";
pub const COL_AUDIO: &str = "녹음파일 주소";

pub const COL_SCHOLARSHIP_NAME: &str = "장학명";
pub const COL_ORGANIZATION: &str = "운영 기관";
pub const COL_TARGET: &str = "주요 대상";
pub const COL_CRITERIA: &str = "선발 기준 / 필요 조건";
pub const COL_AMOUNT: &str = "지원 금액(범위)";
pub const COL_APPLICATION: &str = "신청 방식";
pub const COL_MAX_AMOUNT: &str = "maxAmount";

/// Columns the student roster is expected to have.
pub const STUDENT_COLUMNS: &[&str] = &[COL_GRADE, COL_CLASS, COL_NUMBER, COL_NAME];

/// Journal columns, in the order rows are written.
pub const LOG_COLUMNS: &[&str] = &[
    COL_TIMESTAMP,
    COL_LOCATION,
    COL_GRADE,
    COL_CLASS,
    COL_NUMBER,
    COL_NAME,
    COL_CONTENT,
    COL_AUDIO,
];

/// Scholarship columns shown to the user, in display order.
pub const SCHOLARSHIP_DISPLAY_COLUMNS: &[&str] = &[
    COL_SCHOLARSHIP_NAME,
    COL_ORGANIZATION,
    COL_TARGET,
    COL_CRITERIA,
    COL_AMOUNT,
    COL_APPLICATION,
    COL_MAX_AMOUNT,
];

// =============================================================================
// Student roster
// =============================================================================

/// One row of the student roster. Values are kept as text exactly as the
/// sheet holds them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Student {
    pub grade: String,
    pub class: String,
    pub number: String,
    pub name: String,
}

// =============================================================================
// Counseling journal
// =============================================================================

/// One recorded counseling session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CounselLog {
    /// Timestamp text as stored in the sheet.
    pub timestamp_raw: String,

    /// Parsed timestamp. `None` when the text matches no known layout;
    /// such sessions sort after all dated ones.
    #[serde(skip)]
    pub timestamp: Option<NaiveDateTime>,

    pub location: String,
    pub grade: String,
    pub class: String,
    pub number: String,
    pub name: String,

    /// Free-text session notes (NoteText).
    pub content: String,

    /// Recording link or attachment note.
    pub audio: String,
}

impl CounselLog {
    /// Values in `LOG_COLUMNS` order.
    pub fn to_row(&self) -> [&str; 8] {
        [
            &self.timestamp_raw,
            &self.location,
            &self.grade,
            &self.class,
            &self.number,
            &self.name,
            &self.content,
            &self.audio,
        ]
    }
}

// =============================================================================
// Scholarships
// =============================================================================

/// One scholarship programme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scholarship {
    pub name: String,
    pub organization: String,
    pub target: String,
    pub criteria: String,

    /// Award description (AmountText), e.g. "월 20~50만원".
    pub amount_text: String,

    pub application: String,

    /// Estimated annual maximum in 만원 (AnnualMaxAmount).
    #[serde(rename = "maxAmount")]
    pub max_amount: u64,
}

impl Scholarship {
    /// Values in `SCHOLARSHIP_DISPLAY_COLUMNS` order.
    pub fn to_row(&self) -> [String; 7] {
        [
            self.name.clone(),
            self.organization.clone(),
            self.target.clone(),
            self.criteria.clone(),
            self.amount_text.clone(),
            self.application.clone(),
            self.max_amount.to_string(),
        ]
    }
}

// =============================================================================
// Counseling locations
// =============================================================================

/// Rooms where a session can take place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Location {
    StaffRoom,
    CounselingRoom1,
    CounselingRoom2,
}

impl Location {
    /// All locations in display order.
    pub fn all() -> &'static [Location] {
        &[
            Location::StaffRoom,
            Location::CounselingRoom1,
            Location::CounselingRoom2,
        ]
    }

    /// Label written to the journal.
    pub fn label(&self) -> &'static str {
        match self {
            Location::StaffRoom => "교무실",
            Location::CounselingRoom1 => "상담실1",
            Location::CounselingRoom2 => "상담실2",
        }
    }

    /// Look up a location by its journal label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|l| l.label() == label.trim())
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Loaded data set
// =============================================================================

/// The three tables behind the dashboard.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub students: Vec<Student>,
    pub logs: Vec<CounselLog>,
    pub scholarships: Vec<Scholarship>,

    /// Non-fatal problems noticed while decoding (e.g. missing columns).
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::constants::LOCATIONS;

    #[test]
    fn test_location_labels_match_constants() {
        let labels: Vec<_> = Location::all().iter().map(|l| l.label()).collect();
        assert_eq!(labels, LOCATIONS);
    }

    #[test]
    fn test_location_from_label() {
        assert_eq!(Location::from_label("상담실2"), Some(Location::CounselingRoom2));
        assert_eq!(Location::from_label(" 교무실 "), Some(Location::StaffRoom));
        assert_eq!(Location::from_label("도서관"), None);
    }

    #[test]
    fn test_log_row_follows_column_order() {
        let log = CounselLog {
            timestamp_raw: "2024-03-05 10:00:00".to_string(),
            location: "상담실1".to_string(),
            grade: "2".to_string(),
            class: "3".to_string(),
            number: "14".to_string(),
            name: "김하늘".to_string(),
            content: "진로 상담".to_string(),
            audio: String::new(),
            ..Default::default()
        };
        let row = log.to_row();
        assert_eq!(row.len(), LOG_COLUMNS.len());
        assert_eq!(row[1], "상담실1");
        assert_eq!(row[5], "김하늘");
    }

    #[test]
    fn test_scholarship_json_uses_max_amount_key() {
        let s = Scholarship {
            name: "희망장학금".to_string(),
            max_amount: 600,
            ..Default::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"maxAmount\":600"));
    }
}
