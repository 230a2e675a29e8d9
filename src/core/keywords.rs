// CounselDesk - core/keywords.rs
//
// Keyword frequency extraction from Korean counseling notes.
// Core layer: pure logic, no I/O.
//
// Pipeline per call:
//   1. replace anything that is not a letter, number, underscore, Hangul
//      syllable, or whitespace with a space
//   2. split on whitespace and keep candidates of at least 2 characters
//   3. strip one trailing particle/ending (single pass, never repeated)
//   4. drop tokens shorter than 2 characters and stop-words
//   5. count, remembering first-seen order
//   6. stable sort by count descending and truncate to top-K
//
// The particle pattern, sanitiser, and stop-word set are built once per
// process and shared read-only by every caller.

use crate::util::constants::MIN_TOKEN_CHARS;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Ranked keyword counts: `(token, occurrences)`, most frequent first.
pub type KeywordCounts = Vec<(String, usize)>;

/// Trailing particles and endings removed from a token, as one alternation.
///
/// The earliest-starting suffix that reaches the end of the token wins, so
/// "으로" is removed whole rather than just "로".
const PARTICLE_PATTERN: &str = "(은|는|이|가|을|를|의|에|에게|에서|로|으로|과|와|도|만|보다|처럼|까지|마저|조차|부터|이나|거나|하고|하며|해서|이다|입니다|있다|없다|됩니다|된|하는|있는|없는|적인)$";

/// Characters that survive sanitising: letters, numbers of any kind
/// (including "²"), underscore, Hangul syllables, and whitespace. Combining
/// marks are not letters and become separators.
const SANITISE_PATTERN: &str = r"[^\p{L}\p{N}_\s가-힣]";

/// Words too common in counseling notes to carry meaning.
const KOREAN_STOPWORDS: &[&str] = &[
    "이", "그", "저", "것", "수", "등", "들", "및", "제",
    "년", "월", "일", "시", "분", "초", "때", "경우", "때문",
    "사람", "문제", "내용", "정도", "자신", "생각", "말씀",
    "네", "예", "아니요", "음", "어", "아", "저기",
    "그래서", "그러나", "하지만", "그리고", "그런데",
    "좀", "더", "잘", "안", "못", "다", "또", "꼭",
    "참", "정말", "진짜", "너무", "아주", "매우",
];

fn particle_regex() -> &'static Regex {
    static PARTICLES: OnceLock<Regex> = OnceLock::new();
    PARTICLES.get_or_init(|| Regex::new(PARTICLE_PATTERN).expect("keywords: invalid particle regex"))
}

fn sanitise_regex() -> &'static Regex {
    static SANITISE: OnceLock<Regex> = OnceLock::new();
    SANITISE.get_or_init(|| Regex::new(SANITISE_PATTERN).expect("keywords: invalid sanitise regex"))
}

fn stopwords() -> &'static HashSet<&'static str> {
    static STOPWORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOPWORDS.get_or_init(|| KOREAN_STOPWORDS.iter().copied().collect())
}

/// Returns true if `token` is in the stop-word set.
pub fn is_stopword(token: &str) -> bool {
    stopwords().contains(token)
}

/// Remove at most one trailing particle from `token`.
pub fn strip_particle(token: &str) -> &str {
    match particle_regex().find(token) {
        Some(m) => &token[..m.start()],
        None => token,
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Extract the `top_k` most frequent keywords from `text`.
///
/// Missing, empty, or whitespace-only text and `top_k == 0` all yield an
/// empty result. Ties keep the order in which tokens were first seen.
pub fn extract_keywords(text: Option<&str>, top_k: usize) -> KeywordCounts {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Vec::new(),
    };
    if top_k == 0 {
        return Vec::new();
    }

    let cleaned = sanitise_regex().replace_all(text, " ");

    // Index into `counts` per token, so counting keeps first-seen order.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for candidate in cleaned.split_whitespace() {
        if char_len(candidate) < MIN_TOKEN_CHARS {
            continue;
        }
        let token = strip_particle(candidate);
        if char_len(token) < MIN_TOKEN_CHARS || is_stopword(token) {
            continue;
        }
        match index.get(token) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(token, counts.len());
                counts.push((token, 1));
            }
        }
    }

    // sort_by is stable: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(top_k);

    tracing::debug!(
        distinct = index.len(),
        returned = counts.len(),
        "Keywords extracted"
    );

    counts
        .into_iter()
        .map(|(token, count)| (token.to_string(), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(items: &[(&str, usize)]) -> KeywordCounts {
        items.iter().map(|(t, c)| (t.to_string(), *c)).collect()
    }

    #[test]
    fn test_empty_and_missing_text() {
        assert!(extract_keywords(Some(""), 10).is_empty());
        assert!(extract_keywords(Some("   \n\t "), 10).is_empty());
        assert!(extract_keywords(None, 10).is_empty());
    }

    #[test]
    fn test_zero_top_k_is_empty() {
        assert!(extract_keywords(Some("상담 상담 학생"), 0).is_empty());
    }

    #[test]
    fn test_most_frequent_first() {
        let text = "상담 학생 상담 상담 학생 상담 상담";
        assert_eq!(extract_keywords(Some(text), 1), kw(&[("상담", 5)]));
        assert_eq!(
            extract_keywords(Some(text), 10),
            kw(&[("상담", 5), ("학생", 2)])
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let text = "수학 영어 영어 수학 과학";
        assert_eq!(
            extract_keywords(Some(text), 10),
            kw(&[("수학", 2), ("영어", 2), ("과학", 1)])
        );
        let reordered = "영어 수학 과학 수학 영어";
        assert_eq!(
            extract_keywords(Some(reordered), 10),
            kw(&[("영어", 2), ("수학", 2), ("과학", 1)])
        );
    }

    #[test]
    fn test_token_order_does_not_change_counts() {
        let a: HashMap<_, _> = extract_keywords(Some("학업 성적 학업 친구 성적 학업"), 10)
            .into_iter()
            .collect();
        let b: HashMap<_, _> = extract_keywords(Some("친구 학업 학업 성적 성적 학업"), 10)
            .into_iter()
            .collect();
        assert_eq!(a, b);
        assert_eq!(a["학업"], 3);
    }

    #[test]
    fn test_fewer_tokens_than_top_k() {
        assert_eq!(extract_keywords(Some("학업 상담"), 50).len(), 2);
    }

    #[test]
    fn test_particles_are_stripped() {
        assert_eq!(strip_particle("학생에게"), "학생");
        assert_eq!(strip_particle("학교에서"), "학교");
        assert_eq!(strip_particle("진로를"), "진로");
        assert_eq!(strip_particle("친구들과"), "친구들");
        assert_eq!(strip_particle("공부하는"), "공부");
        assert_eq!(strip_particle("가족이다"), "가족");
        assert_eq!(strip_particle("서울으로"), "서울");
        assert_eq!(strip_particle("상담"), "상담");
    }

    #[test]
    fn test_particle_stripped_once_only() {
        // "는" is removed; the "에게" left behind is not stripped again.
        assert_eq!(strip_particle("학생들에게는"), "학생들에게");
    }

    #[test]
    fn test_counts_merge_after_stripping() {
        let text = "학업을 고민하는 학생. 학업에 대해 이야기함. 학업!";
        let result = extract_keywords(Some(text), 1);
        assert_eq!(result, kw(&[("학업", 3)]));
    }

    #[test]
    fn test_word_ending_in_particle_is_shortened() {
        // "진로" itself ends in "로" and shrinks to "진", which is too short;
        // only "진로를" yields "진로".
        assert_eq!(strip_particle("진로"), "진");
        assert_eq!(extract_keywords(Some("진로 진로를"), 10), kw(&[("진로", 1)]));
    }

    #[test]
    fn test_short_tokens_after_stripping_are_dropped() {
        // "나는" -> "나", "있다" -> "" : both too short.
        assert!(extract_keywords(Some("나는 있다 저는"), 10).is_empty());
    }

    #[test]
    fn test_stopwords_are_dropped() {
        let text = "그리고 정말 정말로 학업 그런데 너무";
        assert_eq!(extract_keywords(Some(text), 10), kw(&[("학업", 1)]));
    }

    #[test]
    fn test_punctuation_becomes_separator() {
        let text = "교우관계,교우관계!(교우관계)";
        assert_eq!(extract_keywords(Some(text), 10), kw(&[("교우관계", 3)]));
    }

    #[test]
    fn test_other_numbers_kept_combining_marks_dropped() {
        assert_eq!(
            extract_keywords(Some("면적 m² m²"), 10),
            kw(&[("m²", 2), ("면적", 1)])
        );
        assert_eq!(extract_keywords(Some("cafe\u{301}"), 10), kw(&[("cafe", 1)]));
    }

    #[test]
    fn test_latin_words_and_digits_are_tokens() {
        let text = "SAT 준비, SAT 점수 2024";
        assert_eq!(
            extract_keywords(Some(text), 10),
            kw(&[("SAT", 2), ("준비", 1), ("점수", 1), ("2024", 1)])
        );
    }

    #[test]
    fn test_output_invariants_hold() {
        let text = "이 학생은 친구가 없다고 했다. 그래서 정말 힘들다, 너무 힘들다. 나 너 우리 \
                    상담실에서 만나 진로와 성적을 이야기하고 있는 중이다";
        let result = extract_keywords(Some(text), 5);
        assert!(result.len() <= 5);
        for (token, count) in &result {
            assert!(*count >= 1);
            assert!(token.chars().count() >= MIN_TOKEN_CHARS, "short token {token}");
            assert!(!is_stopword(token), "stop-word {token}");
        }
    }
}
