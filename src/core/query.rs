// CounselDesk - core/query.rs
//
// Read-side queries behind the four dashboard views: roster lookup, a
// student's history, the monthly summary, and the scholarship threshold.
// Core layer: pure logic, no I/O.

use crate::core::model::{CounselLog, Scholarship, Student};
use chrono::Datelike;
use std::collections::HashSet;

/// Distinct non-empty student names in roster order.
pub fn student_names(students: &[Student]) -> Vec<&str> {
    let mut seen = HashSet::new();
    students
        .iter()
        .map(|s| s.name.as_str())
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .collect()
}

/// First roster row for `name`.
pub fn find_student<'a>(students: &'a [Student], name: &str) -> Option<&'a Student> {
    students.iter().find(|s| s.name == name)
}

/// A student's sessions, newest first. Undated sessions go last and keep
/// their journal order.
pub fn logs_for_student<'a>(logs: &'a [CounselLog], name: &str) -> Vec<&'a CounselLog> {
    let mut selected: Vec<&CounselLog> = logs.iter().filter(|l| l.name == name).collect();
    // Stable sort; `None` compares lower than any `Some`, so reversing the
    // comparison puts undated sessions at the end.
    selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    selected
}

/// Distinct years that have at least one dated session, newest first.
pub fn log_years(logs: &[CounselLog]) -> Vec<i32> {
    let mut years: Vec<i32> = logs
        .iter()
        .filter_map(|l| l.timestamp.map(|t| t.year()))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years
}

/// Sessions dated within the given calendar month.
pub fn logs_in_month(logs: &[CounselLog], year: i32, month: u32) -> Vec<&CounselLog> {
    logs.iter()
        .filter(|l| {
            l.timestamp
                .map_or(false, |t| t.year() == year && t.month() == month)
        })
        .collect()
}

/// Non-empty session notes joined by single spaces, for keyword extraction.
pub fn combined_notes<'a, I>(logs: I) -> String
where
    I: IntoIterator<Item = &'a CounselLog>,
{
    logs.into_iter()
        .map(|l| l.content.as_str())
        .filter(|c| !c.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scholarships whose annual maximum meets the threshold (inclusive).
pub fn filter_scholarships(list: &[Scholarship], min_amount: u64) -> Vec<&Scholarship> {
    list.iter().filter(|s| s.max_amount >= min_amount).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::parse_timestamp;

    fn student(name: &str) -> Student {
        Student {
            grade: "1".to_string(),
            class: "2".to_string(),
            number: "3".to_string(),
            name: name.to_string(),
        }
    }

    fn log(name: &str, ts: &str, content: &str) -> CounselLog {
        CounselLog {
            timestamp_raw: ts.to_string(),
            timestamp: parse_timestamp(ts),
            name: name.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    fn scholarship(name: &str, max_amount: u64) -> Scholarship {
        Scholarship {
            name: name.to_string(),
            max_amount,
            ..Default::default()
        }
    }

    #[test]
    fn test_student_names_distinct_in_order() {
        let roster = vec![student("나래"), student(""), student("가람"), student("나래")];
        assert_eq!(student_names(&roster), vec!["나래", "가람"]);
    }

    #[test]
    fn test_find_student() {
        let roster = vec![student("나래"), student("가람")];
        assert_eq!(find_student(&roster, "가람").unwrap().name, "가람");
        assert!(find_student(&roster, "다솜").is_none());
    }

    #[test]
    fn test_logs_for_student_newest_first_undated_last() {
        let logs = vec![
            log("나래", "2024-03-01 09:00:00", "a"),
            log("가람", "2024-05-01 09:00:00", "x"),
            log("나래", "unknown", "b"),
            log("나래", "2024-04-01 09:00:00", "c"),
        ];
        let contents: Vec<_> = logs_for_student(&logs, "나래")
            .iter()
            .map(|l| l.content.as_str())
            .collect();
        assert_eq!(contents, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_log_years_descending() {
        let logs = vec![
            log("a", "2023-03-01", ""),
            log("a", "2024-03-01", ""),
            log("a", "2023-11-01", ""),
            log("a", "", ""),
        ];
        assert_eq!(log_years(&logs), vec![2024, 2023]);
    }

    #[test]
    fn test_logs_in_month() {
        let logs = vec![
            log("a", "2024-03-01 10:00:00", "march"),
            log("a", "2024-03-31 23:59:59", "march end"),
            log("a", "2024-04-01 00:00:00", "april"),
            log("a", "2023-03-15", "last year"),
        ];
        let march: Vec<_> = logs_in_month(&logs, 2024, 3)
            .iter()
            .map(|l| l.content.as_str())
            .collect();
        assert_eq!(march, vec!["march", "march end"]);
    }

    #[test]
    fn test_combined_notes_skips_blank() {
        let logs = vec![log("a", "", "진로 상담"), log("a", "", "  "), log("a", "", "성적")];
        assert_eq!(combined_notes(&logs), "진로 상담 성적");
    }

    #[test]
    fn test_scholarship_threshold_is_inclusive() {
        let list = vec![scholarship("A", 200), scholarship("B", 600), scholarship("C", 0)];
        let names = |min| -> Vec<String> {
            filter_scholarships(&list, min)
                .iter()
                .map(|s| s.name.clone())
                .collect()
        };
        assert_eq!(names(0), vec!["A", "B", "C"]);
        assert_eq!(names(200), vec!["A", "B"]);
        assert_eq!(names(210), vec!["B"]);
        assert_eq!(names(1000), Vec::<String>::new());
    }
}
