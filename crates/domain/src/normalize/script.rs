//! Target-script profiles
//!
//! Every text heuristic in this module tree is driven by a [`ScriptProfile`]:
//! which characters count as "in-language", which quote marks wrap an answer,
//! which labels introduce one, and where sentences end. Supporting another
//! language means supplying another [`ScriptTable`].

use regex::Regex;

/// Static description of a target language
#[derive(Debug)]
pub struct ScriptTable {
    pub name: &'static str,
    /// Inclusive code point ranges considered target script
    pub ranges: &'static [(char, char)],
    /// Open/close pairs whose content may hold the answer inside reasoning text
    pub quote_pairs: &'static [(char, char)],
    /// Characters stripped from the start of a candidate
    pub leading_quotes: &'static [char],
    /// Characters stripped from the end of a candidate
    pub trailing_quotes: &'static [char],
    /// Labels that introduce an answer line inside reasoning text
    pub answer_labels: &'static [&'static str],
    /// Labels stripped from the front of a summary
    pub prefix_labels: &'static [&'static str],
    /// Sentence terminators, target and Latin
    pub sentence_terminators: &'static [char],
    /// Target-language full stops, in preference order
    pub full_stops: &'static [char],
}

/// Hiragana, katakana and CJK ideographs
pub static JAPANESE: ScriptTable = ScriptTable {
    name: "ja",
    ranges: &[('\u{3040}', '\u{30FF}'), ('\u{3400}', '\u{9FFF}')],
    quote_pairs: &[('「', '」'), ('"', '"')],
    leading_quotes: &['「', '"', '\''],
    trailing_quotes: &['」', '"', '\''],
    answer_labels: &["So summary", "Summary", "要約", "出力"],
    prefix_labels: &["要約", "まとめ"],
    sentence_terminators: &['。', '．', '！', '!', '？', '?', '.'],
    full_stops: &['。', '．'],
};

/// A [`ScriptTable`] with its label patterns compiled
#[derive(Debug, Clone)]
pub struct ScriptProfile {
    table: &'static ScriptTable,
    answer_label: Regex,
    prefix_label: Regex,
}

impl ScriptProfile {
    pub fn from_table(table: &'static ScriptTable) -> Self {
        let answer_label = Regex::new(&format!(
            r"(?i)(?:{})\s*[:：]\s*([^\r\n]+)",
            alternation(table.answer_labels)
        ))
        .expect("Valid regex");
        let prefix_label = Regex::new(&format!(
            r"^(?:{})\s*[:：]\s*",
            alternation(table.prefix_labels)
        ))
        .expect("Valid regex");

        Self {
            table,
            answer_label,
            prefix_label,
        }
    }

    pub fn japanese() -> Self {
        Self::from_table(&JAPANESE)
    }

    pub fn table(&self) -> &'static ScriptTable {
        self.table
    }

    pub fn is_target_char(&self, c: char) -> bool {
        self.table
            .ranges
            .iter()
            .any(|(lo, hi)| (*lo..=*hi).contains(&c))
    }

    pub fn has_target(&self, text: &str) -> bool {
        text.chars().any(|c| self.is_target_char(c))
    }

    pub fn count_target(&self, text: &str) -> usize {
        text.chars().filter(|c| self.is_target_char(*c)).count()
    }

    /// Text captured after every answer label, in order of appearance.
    ///
    /// A capture ends at the first closing quote it did not open itself, and
    /// trailing ellipses and whitespace are dropped.
    pub fn labeled_answers<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.answer_label
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .map(|answer| self.trim_answer(answer))
            .filter(|answer| !answer.is_empty())
            .collect()
    }

    fn trim_answer<'t>(&self, answer: &'t str) -> &'t str {
        let end = answer
            .char_indices()
            .find(|(idx, c)| self.closes_unopened_quote(answer, *idx, *c))
            .map_or(answer.len(), |(idx, _)| idx);

        answer[..end].trim_end_matches(|c: char| c.is_whitespace() || c == '.' || c == '…')
    }

    fn closes_unopened_quote(&self, answer: &str, idx: usize, c: char) -> bool {
        if !self.table.trailing_quotes.contains(&c) {
            return false;
        }

        let before = &answer[..idx];
        let open = self
            .table
            .quote_pairs
            .iter()
            .find(|(_, close)| *close == c)
            .map_or(c, |(open, _)| *open);

        if open == c {
            // An apostrophe inside a word ("We'll") is not a quote
            let next = answer[idx + c.len_utf8()..].chars().next();
            if c == '\'' && next.is_some_and(|n| n.is_alphanumeric()) {
                return false;
            }
            before.matches(c).count() % 2 == 0
        } else {
            before.matches(open).count() <= before.matches(c).count()
        }
    }

    /// Remove a leading "要約:"-style label
    pub fn strip_prefix_label<'t>(&self, text: &'t str) -> &'t str {
        match self.prefix_label.find(text) {
            Some(m) => &text[m.end()..],
            None => text,
        }
    }

    pub fn is_sentence_terminator(&self, c: char) -> bool {
        self.table.sentence_terminators.contains(&c)
    }
}

impl Default for ScriptProfile {
    fn default() -> Self {
        Self::japanese()
    }
}

fn alternation(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

pub(crate) fn latin_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_ascii_alphabetic()).count()
}

/// Longest candidate by character count; the earliest wins a tie
pub(crate) fn longest<S: AsRef<str>>(candidates: impl IntoIterator<Item = S>) -> Option<S> {
    let mut best: Option<(usize, S)> = None;
    for candidate in candidates {
        let len = candidate.as_ref().chars().count();
        if best.as_ref().is_none_or(|(best_len, _)| len > *best_len) {
            best = Some((len, candidate));
        }
    }
    best.map(|(_, s)| s)
}
