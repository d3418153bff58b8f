//! Exact-match scoring for the numeric word-problem family.
//!
//! Answer extraction walks an ordered cascade of patterns, most specific
//! first; the first match wins. Correctness compares parsed floats within
//! an absolute tolerance and falls back to case-insensitive string
//! equality when either side is not numeric. Scores are binary; this
//! family has no partial credit.

use std::sync::OnceLock;

use regex::Regex;

/// Absolute tolerance for numeric equality.
pub const NUMERIC_TOLERANCE: f64 = 1e-6;

const NUMBER: &str = r"[+-]?\d+(?:\.\d+)?";

/// Extraction cascade, most specific first:
/// 1. "the answer is N" / "answer is N" / "answer: N"
/// 2. "N is the answer" / "N is the final answer"
/// 3. "final answer: N"
/// 4. a bare number anchored at the end of the text
fn extraction_patterns() -> &'static [Regex; 4] {
    static PATTERNS: OnceLock<[Regex; 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(&format!(
                r"(?i)(?:the answer is|answer is|answer:)\s*({NUMBER})"
            ))
            .expect("valid pattern"),
            Regex::new(&format!(
                r"(?i)({NUMBER})\s*(?:is the answer|is the final answer)"
            ))
            .expect("valid pattern"),
            Regex::new(&format!(r"(?i)final answer[:\s]*({NUMBER})")).expect("valid pattern"),
            Regex::new(&format!(r"({NUMBER})\s*$")).expect("valid pattern"),
        ]
    })
}

fn any_number() -> &'static Regex {
    static ANY: OnceLock<Regex> = OnceLock::new();
    ANY.get_or_init(|| Regex::new(NUMBER).expect("valid pattern"))
}

/// Extract a candidate numeric answer from raw subject text.
///
/// The first cascade rule that matches wins; when no rule matches, the
/// last number appearing anywhere in the text is used. Returns an empty
/// string when the text contains no number at all.
pub fn extract_numeric_answer(response: &str) -> String {
    for pattern in extraction_patterns() {
        if let Some(caps) = pattern.captures(response) {
            return caps[1].trim().to_string();
        }
    }

    any_number()
        .find_iter(response)
        .last()
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Check an extracted answer against the expected ground truth.
///
/// Both sides are parsed as floats and compared within
/// [`NUMERIC_TOLERANCE`]; if either fails to parse, falls back to
/// case-insensitive trimmed string equality.
pub fn check_numeric_answer(predicted: &str, expected: &str) -> bool {
    match (
        predicted.trim().parse::<f64>(),
        expected.trim().parse::<f64>(),
    ) {
        (Ok(p), Ok(e)) => (p - e).abs() < NUMERIC_TOLERANCE,
        _ => predicted.trim().to_lowercase() == expected.trim().to_lowercase(),
    }
}
