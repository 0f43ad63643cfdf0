//! Recover an answer sentence from a leaked reasoning transcript
//!
//! Priority: quoted spans, then labeled lines, then the longest plausible line.
//! An explicit quote or label is trusted over a guessed line.

use regex::Regex;
use std::sync::LazyLock;

use super::script::{ScriptProfile, longest};

const QUOTE_MIN_CHARS: usize = 10;
const QUOTE_MAX_CHARS: usize = 400;
const LINE_MIN_CHARS: usize = 20;
const LINE_MAX_CHARS: usize = 400;
const CANDIDATE_MAX_CHARS: usize = 350;

static TRAILING_FILLER: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\s+We'll output.*$").expect("Valid regex"),
        Regex::new(r"(?i)\s+Should be fine\.*$").expect("Valid regex"),
    ]
});

/// Best summary candidate inside `reasoning`, or `None` when nothing qualifies
pub fn extract_summary_candidate(profile: &ScriptProfile, reasoning: &str) -> Option<String> {
    if reasoning.trim().is_empty() {
        return None;
    }

    from_quotes(profile, reasoning)
        .or_else(|| from_labels(profile, reasoning))
        .or_else(|| from_lines(profile, reasoning))
}

fn from_quotes(profile: &ScriptProfile, text: &str) -> Option<String> {
    let spans = profile
        .table()
        .quote_pairs
        .iter()
        .flat_map(|(open, close)| {
            quoted_spans(text, *open, *close, QUOTE_MIN_CHARS, QUOTE_MAX_CHARS)
        })
        .filter(|span| profile.has_target(span));

    longest(spans).map(str::to_string)
}

fn from_labels(profile: &ScriptProfile, text: &str) -> Option<String> {
    let answers = profile
        .labeled_answers(text)
        .into_iter()
        .filter(|answer| profile.has_target(answer));

    longest(answers).map(str::to_string)
}

fn from_lines(profile: &ScriptProfile, text: &str) -> Option<String> {
    let lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && profile.has_target(line))
        .filter(|line| (LINE_MIN_CHARS..=LINE_MAX_CHARS).contains(&line.chars().count()));

    longest(lines).map(str::to_string)
}

/// Spans between `open` and the next `close` whose length is within bounds.
///
/// A span that is out of bounds does not consume its closing mark, so the
/// scan resumes right after the opening mark.
pub fn quoted_spans(text: &str, open: char, close: char, min: usize, max: usize) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(open) {
        let start = cursor + offset + open.len_utf8();
        let Some(end_offset) = text[start..].find(close) else {
            break;
        };
        let end = start + end_offset;
        let span = &text[start..end];
        let len = span.chars().count();

        if (min..=max).contains(&len) {
            spans.push(span);
            cursor = end + close.len_utf8();
        } else {
            cursor = start;
        }
    }

    spans
}

/// Light cleanup applied to a candidate before sanitizing: drops trailing
/// English filler the model tends to append and caps the length.
pub fn postprocess_candidate(candidate: &str) -> String {
    let mut cleaned = candidate.trim().to_string();
    for filler in TRAILING_FILLER.iter() {
        cleaned = filler.replace(&cleaned, "").into_owned();
    }
    cleaned.chars().take(CANDIDATE_MAX_CHARS).collect()
}
