//! Reduce any candidate text to a short, single-language summary

use super::script::{ScriptProfile, latin_count};
use crate::ports::AiError;

/// Limits applied by [`SummarySanitizer`]; both are always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeLimits {
    max_chars: usize,
    max_sentences: usize,
}

impl SanitizeLimits {
    /// Fails with [`AiError::Config`] when either limit is zero
    pub fn new(max_chars: usize, max_sentences: usize) -> Result<Self, AiError> {
        if max_chars == 0 || max_sentences == 0 {
            return Err(AiError::Config(format!(
                "Summary limits must be positive (max_chars: {}, max_sentences: {})",
                max_chars, max_sentences
            )));
        }

        Ok(Self {
            max_chars,
            max_sentences,
        })
    }

    /// Hard cap in characters, no ellipsis
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Sentences kept after filtering
    pub fn max_sentences(&self) -> usize {
        self.max_sentences
    }
}

impl Default for SanitizeLimits {
    fn default() -> Self {
        Self {
            max_chars: 200,
            max_sentences: 2,
        }
    }
}

/// Deterministic summary cleanup driven by a [`ScriptProfile`]
#[derive(Debug, Clone, Default)]
pub struct SummarySanitizer {
    profile: ScriptProfile,
    limits: SanitizeLimits,
}

impl SummarySanitizer {
    pub fn new(profile: ScriptProfile, limits: SanitizeLimits) -> Self {
        Self { profile, limits }
    }

    pub fn profile(&self) -> &ScriptProfile {
        &self.profile
    }

    pub fn sanitize(&self, raw: &str) -> String {
        let text = raw.trim();
        if text.is_empty() {
            return String::new();
        }

        // Without any in-script line the whole text goes through unchanged.
        let candidate = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && self.profile.has_target(line))
            .unwrap_or(text);

        let table = self.profile.table();
        let dequoted = candidate
            .trim_start_matches(|c| table.leading_quotes.contains(&c))
            .trim_end_matches(|c| table.trailing_quotes.contains(&c));
        let unlabeled = self.profile.strip_prefix_label(dequoted).trim();

        let joined: String = self
            .split_sentences(unlabeled)
            .into_iter()
            .filter(|sentence| !self.is_foreign_dominant(sentence))
            .take(self.limits.max_sentences)
            .collect();

        let mut result = if joined.is_empty() {
            unlabeled.to_string()
        } else {
            joined
        };

        if result.chars().any(|c| c.is_ascii_alphabetic()) {
            if let Some(cut) = self.first_full_stop_end(&result) {
                result.truncate(cut);
            }
        }

        result.chars().take(self.limits.max_chars).collect()
    }

    /// Sentences with their terminator attached, trimmed, blanks dropped
    pub fn split_sentences<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for (idx, c) in text.char_indices() {
            if self.profile.is_sentence_terminator(c) {
                let end = idx + c.len_utf8();
                sentences.push(text[start..end].trim());
                start = end;
            }
        }
        sentences.push(text[start..].trim());

        sentences.retain(|s| !s.is_empty());
        sentences
    }

    /// No target characters, or more than two Latin letters and more than
    /// half as many Latin letters as target characters.
    pub fn is_foreign_dominant(&self, sentence: &str) -> bool {
        let target = self.profile.count_target(sentence);
        let latin = latin_count(sentence);
        target == 0 || (latin > 2 && latin > target / 2)
    }

    /// Byte offset just past the first preferred full stop
    fn first_full_stop_end(&self, text: &str) -> Option<usize> {
        self.profile
            .table()
            .full_stops
            .iter()
            .find_map(|stop| text.find(*stop).map(|idx| idx + stop.len_utf8()))
    }
}
