// CounselDesk - core/amount.rs
//
// Annual maximum award estimation from free-text amount descriptions such as
// "연 100~200만원", "월 20~50만원" or "분기 최대 300만원".
// Core layer: pure logic, no I/O.
//
// The unit marker is detected anywhere in the string, not next to the number.
// Text that mentions both a monthly and a quarterly marker is scaled as
// monthly.

use regex::Regex;
use std::sync::OnceLock;

/// Substring marking a monthly amount ("월").
pub const MONTHLY_MARKER: &str = "월";

/// Substring marking a quarterly amount ("분기").
pub const QUARTERLY_MARKER: &str = "분기";

/// Award period implied by an amount description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountPeriod {
    Monthly,
    Quarterly,
    Annual,
}

impl AmountPeriod {
    /// Detect the period from marker substrings, monthly taking priority.
    pub fn detect(amount_text: &str) -> Self {
        if amount_text.contains(MONTHLY_MARKER) {
            AmountPeriod::Monthly
        } else if amount_text.contains(QUARTERLY_MARKER) {
            AmountPeriod::Quarterly
        } else {
            AmountPeriod::Annual
        }
    }

    /// Number of periods per year.
    pub fn per_year(self) -> u64 {
        match self {
            AmountPeriod::Monthly => 12,
            AmountPeriod::Quarterly => 4,
            AmountPeriod::Annual => 1,
        }
    }
}

/// Runs of Unicode decimal digits, so full-width "５０" counts like "50".
fn digit_runs() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("amount: invalid digit regex"))
}

fn is_decimal_digit(c: char) -> bool {
    static DIGIT: OnceLock<Regex> = OnceLock::new();
    let mut buf = [0u8; 4];
    DIGIT
        .get_or_init(|| Regex::new(r"\A\d\z").expect("amount: invalid single digit regex"))
        .is_match(c.encode_utf8(&mut buf))
}

/// Value 0-9 of a decimal digit from any script.
///
/// Decimal digits are encoded in contiguous blocks of ten starting at zero,
/// so the value is the distance from the start of the run of digit code
/// points, modulo ten.
fn digit_value(c: char) -> u64 {
    if let Some(d) = c.to_digit(10) {
        return u64::from(d);
    }
    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    u64::from((c as u32 - start) % 10)
}

/// Fold a digit run into an integer, saturating at `u64::MAX`.
fn run_value(run: &str) -> u64 {
    run.chars()
        .try_fold(0u64, |acc, c| {
            acc.checked_mul(10)?.checked_add(digit_value(c))
        })
        .unwrap_or(u64::MAX)
}

/// Estimate the annual maximum amount described by `amount_text`.
///
/// Takes the largest embedded integer (any script's decimal digits) and
/// scales it by the detected period.
/// A missing value or text without digits yields 0. Oversized numbers
/// saturate at `u64::MAX` instead of failing.
pub fn estimate(amount_text: Option<&str>) -> u64 {
    let Some(text) = amount_text else {
        return 0;
    };

    let max = digit_runs()
        .find_iter(text)
        .map(|m| run_value(m.as_str()))
        .max();

    match max {
        Some(n) => n.saturating_mul(AmountPeriod::detect(text).per_year()),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annual_range_takes_upper_bound() {
        assert_eq!(estimate(Some("연 100~200만원")), 200);
    }

    #[test]
    fn test_monthly_scales_by_twelve() {
        assert_eq!(estimate(Some("월 20~50만원")), 600);
    }

    #[test]
    fn test_quarterly_scales_by_four() {
        assert_eq!(estimate(Some("분기 최대 300만원")), 1200);
    }

    #[test]
    fn test_no_digits_is_zero() {
        assert_eq!(estimate(Some("")), 0);
        assert_eq!(estimate(Some("전액 지원")), 0);
        assert_eq!(estimate(Some("월 지원금 별도 문의")), 0);
    }

    #[test]
    fn test_missing_value_is_zero() {
        assert_eq!(estimate(None), 0);
    }

    #[test]
    fn test_whitespace_does_not_change_result() {
        let compact = estimate(Some("월20~50만원"));
        let spaced = estimate(Some("  월   20 ~ 50 만원 "));
        assert_eq!(compact, 600);
        assert_eq!(compact, spaced);
    }

    #[test]
    fn test_monthly_marker_wins_over_quarterly() {
        // Both markers present: monthly priority is kept.
        assert_eq!(AmountPeriod::detect("분기별 또는 월 10만원"), AmountPeriod::Monthly);
        assert_eq!(estimate(Some("분기별 또는 월 10만원")), 120);
    }

    #[test]
    fn test_marker_anywhere_in_text() {
        // "월" inside a longer word still counts as the monthly marker.
        assert_eq!(estimate(Some("등록금 전액(최대 400만원), 매월 지급")), 4800);
    }

    #[test]
    fn test_thousands_separator_splits_runs() {
        // "1,000" is two digit runs, "1" and "000"; the larger value is 1.
        assert_eq!(estimate(Some("연 1,000만원")), 1);
    }

    #[test]
    fn test_full_width_digits() {
        assert_eq!(estimate(Some("월 ５０만원")), 600);
        assert_eq!(estimate(Some("연 １００~２５０만원")), 250);
    }

    #[test]
    fn test_digit_values_from_other_scripts() {
        assert_eq!(run_value("０９"), 9);
        // Arabic-Indic and Devanagari digits.
        assert_eq!(run_value("\u{663}\u{660}"), 30);
        assert_eq!(run_value("\u{967}\u{968}"), 12);
        assert_eq!(run_value("7"), 7);
    }

    #[test]
    fn test_oversized_number_saturates() {
        assert_eq!(estimate(Some("연 99999999999999999999999")), u64::MAX);
        assert_eq!(estimate(Some("월 99999999999999999999999")), u64::MAX);
    }

    #[test]
    fn test_period_multipliers() {
        assert_eq!(AmountPeriod::Monthly.per_year(), 12);
        assert_eq!(AmountPeriod::Quarterly.per_year(), 4);
        assert_eq!(AmountPeriod::Annual.per_year(), 1);
        assert_eq!(AmountPeriod::detect("연 100만원"), AmountPeriod::Annual);
    }
}
