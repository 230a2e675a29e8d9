// CounselDesk - core/table.rs
//
// Decoding of the three spreadsheet tabs (CSV text with a header row) into
// typed records. Columns are looked up by header name, so column order and
// extra columns in the sheet do not matter.
//
// Missing columns are tolerated: roster columns produce a warning, journal
// columns read as empty text, and the scholarship maximum is derived from the
// amount description when the sheet does not carry one.

use crate::core::amount;
use crate::core::model::*;
use crate::util::error::TableError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;
use regex::Regex;
use std::sync::OnceLock;

/// Header-name to column-index lookup for one table.
struct Columns {
    headers: Vec<String>,
}

impl Columns {
    fn new(headers: &StringRecord) -> Self {
        let headers = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        Self { headers }
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn has(&self, name: &str) -> bool {
        self.index(name).is_some()
    }

    /// Trimmed cell text, or `None` when the column does not exist.
    fn cell<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.index(name).map(|i| record.get(i).unwrap_or("").trim())
    }

    /// Trimmed cell text, empty when the column does not exist.
    fn text(&self, record: &StringRecord, name: &str) -> String {
        self.cell(record, name).unwrap_or("").to_string()
    }
}

/// Read the header row and all records of a CSV table.
fn read_table(table: &'static str, csv_text: &str) -> Result<(Columns, Vec<StringRecord>), TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| TableError::Csv { table, source: e })?;
    let columns = Columns::new(headers);

    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TableError::Csv { table, source: e })?;

    tracing::debug!(
        table,
        columns = columns.headers.len(),
        rows = records.len(),
        "Table decoded"
    );

    Ok((columns, records))
}

/// Decode the student roster.
///
/// Returns the students and a warning when expected columns are missing.
pub fn parse_students(csv_text: &str) -> Result<(Vec<Student>, Option<String>), TableError> {
    let (columns, records) = read_table("student roster", csv_text)?;

    let missing: Vec<&str> = STUDENT_COLUMNS
        .iter()
        .copied()
        .filter(|c| !columns.has(c))
        .collect();
    let warning = if missing.is_empty() {
        None
    } else {
        tracing::warn!(missing = ?missing, "Student roster is missing columns");
        Some(format!(
            "The student roster needs these columns: {}",
            missing.join(", ")
        ))
    };

    let students = records
        .iter()
        .map(|r| Student {
            grade: columns.text(r, COL_GRADE),
            class: columns.text(r, COL_CLASS),
            number: columns.text(r, COL_NUMBER),
            name: columns.text(r, COL_NAME),
        })
        .collect();

    Ok((students, warning))
}

/// Decode the counseling journal. Missing columns read as empty text.
pub fn parse_logs(csv_text: &str) -> Result<Vec<CounselLog>, TableError> {
    let (columns, records) = read_table("counseling journal", csv_text)?;

    let logs = records
        .iter()
        .map(|r| {
            let timestamp_raw = columns.text(r, COL_TIMESTAMP);
            CounselLog {
                timestamp: parse_timestamp(&timestamp_raw),
                timestamp_raw,
                location: columns.text(r, COL_LOCATION),
                grade: columns.text(r, COL_GRADE),
                class: columns.text(r, COL_CLASS),
                number: columns.text(r, COL_NUMBER),
                name: columns.text(r, COL_NAME),
                content: columns.text(r, COL_CONTENT),
                audio: columns.text(r, COL_AUDIO),
            }
        })
        .collect();

    Ok(logs)
}

/// Decode the scholarship list.
///
/// A `maxAmount` column in the sheet takes precedence and is coerced to an
/// integer; otherwise the maximum is estimated from the amount description.
pub fn parse_scholarships(csv_text: &str) -> Result<Vec<Scholarship>, TableError> {
    let (columns, records) = read_table("scholarship", csv_text)?;
    let sheet_has_max = columns.has(COL_MAX_AMOUNT);

    let scholarships = records
        .iter()
        .map(|r| {
            let amount_cell = columns.cell(r, COL_AMOUNT);
            let max_amount = if sheet_has_max {
                coerce_amount(columns.cell(r, COL_MAX_AMOUNT).unwrap_or(""))
            } else {
                amount::estimate(amount_cell)
            };
            Scholarship {
                name: columns.text(r, COL_SCHOLARSHIP_NAME),
                organization: columns.text(r, COL_ORGANIZATION),
                target: columns.text(r, COL_TARGET),
                criteria: columns.text(r, COL_CRITERIA),
                amount_text: amount_cell.unwrap_or("").to_string(),
                application: columns.text(r, COL_APPLICATION),
                max_amount,
            }
        })
        .collect();

    Ok(scholarships)
}

/// Coerce a sheet-provided amount to a non-negative integer.
///
/// Non-numeric text becomes 0, fractions truncate, negatives clamp to 0.
pub fn coerce_amount(raw: &str) -> u64 {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return n.max(0) as u64;
    }
    match raw.parse::<f64>() {
        // `as` saturates for out-of-range floats.
        Ok(f) if f.is_finite() && f > 0.0 => f.trunc() as u64,
        _ => 0,
    }
}

/// Layouts tried, in order, for timestamps with a time component.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
];

/// Layouts tried for date-only values (taken as midnight).
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Korean-locale form timestamps: "2024. 3. 5 오후 2:22:10".
fn korean_form_regex() -> &'static Regex {
    static KOREAN_FORM: OnceLock<Regex> = OnceLock::new();
    KOREAN_FORM.get_or_init(|| {
        Regex::new(
            r"^(\d{4})\.\s*(\d{1,2})\.\s*(\d{1,2})\.?\s+(오전|오후)\s*(\d{1,2}):(\d{2})(?::(\d{2}))?$",
        )
        .expect("table: invalid korean timestamp regex")
    })
}

fn parse_korean_form(raw: &str) -> Option<NaiveDateTime> {
    let caps = korean_form_regex().captures(raw)?;
    let num = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };

    let date = NaiveDate::from_ymd_opt(caps[1].parse().ok()?, num(2)?, num(3)?)?;
    let hour12 = num(5)?;
    if !(1..=12).contains(&hour12) {
        return None;
    }
    let hour = match (&caps[4], hour12) {
        ("오전", 12) => 0,
        ("오전", h) => h,
        (_, 12) => 12,
        (_, h) => h + 12,
    };
    let second = caps.get(7).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let time = NaiveTime::from_hms_opt(hour, num(6)?, second)?;
    Some(date.and_time(time))
}

/// Parse a journal timestamp leniently.
///
/// Returns `None` for empty or unrecognised text; never fails.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    parse_korean_form(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_students() {
        let csv = "학년,반,번호,이름\n2,3,14,김하늘\n1,1,2,이바다\n";
        let (students, warning) = parse_students(csv).unwrap();
        assert!(warning.is_none());
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].name, "김하늘");
        assert_eq!(students[0].number, "14");
    }

    #[test]
    fn test_students_missing_columns_warns() {
        let csv = "이름,학년\n김하늘,2\n";
        let (students, warning) = parse_students(csv).unwrap();
        let warning = warning.expect("missing columns must warn");
        assert!(warning.contains("반"));
        assert!(warning.contains("번호"));
        assert!(!warning.contains("이름"));
        assert_eq!(students[0].class, "");
        assert_eq!(students[0].grade, "2");
    }

    #[test]
    fn test_headers_with_bom_and_spaces() {
        let csv = "\u{feff}학년 , 반,번호,이름\n3,2,7,박구름\n";
        let (students, warning) = parse_students(csv).unwrap();
        assert!(warning.is_none());
        assert_eq!(students[0].grade, "3");
    }

    #[test]
    fn test_parse_logs_fills_missing_columns() {
        let csv = "타임스탬프,이름,상담내용\n2024-03-05 14:22:10,김하늘,\"진로, 성적 상담\"\n";
        let logs = parse_logs(csv).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].content, "진로, 성적 상담");
        assert_eq!(logs[0].location, "");
        assert_eq!(logs[0].audio, "");
        assert!(logs[0].timestamp.is_some());
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let csv = "타임스탬프,장소,이름,상담내용\n2024-03-05,교무실\n";
        let logs = parse_logs(csv).unwrap();
        assert_eq!(logs[0].location, "교무실");
        assert_eq!(logs[0].name, "");
    }

    #[test]
    fn test_scholarship_max_estimated_from_amount() {
        let csv = "장학명,지원 금액(범위)\nA,연 100~200만원\nB,월 20~50만원\nC,\n";
        let list = parse_scholarships(csv).unwrap();
        let maxes: Vec<u64> = list.iter().map(|s| s.max_amount).collect();
        assert_eq!(maxes, vec![200, 600, 0]);
        assert_eq!(list[1].amount_text, "월 20~50만원");
    }

    #[test]
    fn test_scholarship_sheet_max_takes_precedence() {
        let csv = "장학명,지원 금액(범위),maxAmount\nA,월 20~50만원,450\nB,연 300만원,abc\nC,연 300만원,12.7\n";
        let list = parse_scholarships(csv).unwrap();
        let maxes: Vec<u64> = list.iter().map(|s| s.max_amount).collect();
        assert_eq!(maxes, vec![450, 0, 12]);
    }

    #[test]
    fn test_scholarship_without_amount_column() {
        let csv = "장학명\nA\n";
        let list = parse_scholarships(csv).unwrap();
        assert_eq!(list[0].max_amount, 0);
        assert_eq!(list[0].amount_text, "");
    }

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount("300"), 300);
        assert_eq!(coerce_amount(" 42 "), 42);
        assert_eq!(coerce_amount("-5"), 0);
        assert_eq!(coerce_amount("99.9"), 99);
        assert_eq!(coerce_amount(""), 0);
        assert_eq!(coerce_amount("NaN"), 0);
        assert_eq!(coerce_amount("1,200"), 0);
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        let dt = parse_timestamp("2024-03-05 14:22:10").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2024, 3, 5, 14));

        assert!(parse_timestamp("2024/03/05 09:10").is_some());
        assert!(parse_timestamp("2024.03.05 09:10:00").is_some());
        assert!(parse_timestamp("2024-03-05T09:10:00").is_some());
        assert!(parse_timestamp("2024-03-05T09:10:00+09:00").is_some());

        let d = parse_timestamp("2024-03-05").unwrap();
        assert_eq!(d.hour(), 0);
    }

    #[test]
    fn test_parse_korean_form_timestamp() {
        let pm = parse_timestamp("2024. 3. 5 오후 2:22:10").unwrap();
        assert_eq!((pm.month(), pm.day(), pm.hour(), pm.minute()), (3, 5, 14, 22));

        let midnight = parse_timestamp("2024. 3. 5 오전 12:05:00").unwrap();
        assert_eq!(midnight.hour(), 0);

        let noon = parse_timestamp("2024. 3. 5 오후 12:05").unwrap();
        assert_eq!(noon.hour(), 12);
    }

    #[test]
    fn test_unparseable_timestamp_is_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("어제 오후").is_none());
        assert!(parse_timestamp("2024-13-40 10:00:00").is_none());
    }

    #[test]
    fn test_empty_input_is_empty_table() {
        assert!(parse_logs("").unwrap().is_empty());
        let (students, warning) = parse_students("").unwrap();
        assert!(students.is_empty());
        assert!(warning.is_some());
    }
}
