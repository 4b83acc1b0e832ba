//! Text normalization and tokenization.

use std::collections::HashSet;

use regex::Regex;

/// French stopwords dropped during tokenization.
const STOPWORDS: &[&str] = &[
    "le", "la", "les", "un", "une", "des", "de", "du", "à", "au", "et", "ou", "mais", "donc",
    "car", "si", "que", "qui", "quoi", "ce", "cette", "mon", "ma", "mes", "je", "tu", "il",
    "elle", "nous", "vous", "ils", "elles", "en", "y", "dans", "sur", "est",
];

/// Text normalizer owning the compiled punctuation-run pattern and the
/// stopword set. Built once, read-only afterwards.
#[derive(Debug)]
pub struct TextNormalizer {
    punct_run: Regex,
    stopwords: HashSet<&'static str>,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            punct_run: Regex::new(r"[!?]{2,}").unwrap(),
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    /// Normalize raw text: lower-case, trim, collapse runs of `!`/`?` into
    /// a single `!`, collapse whitespace.
    pub fn preprocess(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let collapsed = self.punct_run.replace_all(lowered.trim(), "!");
        collapsed.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Split text into content tokens: ASCII punctuation stripped,
    /// lower-cased, whitespace-split, stopwords and tokens of two chars or
    /// fewer dropped.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let stripped: String = text.chars().filter(|c| !c.is_ascii_punctuation()).collect();
        stripped
            .to_lowercase()
            .split_whitespace()
            .filter(|t| !self.stopwords.contains(*t))
            .filter(|t| t.chars().count() > 2)
            .map(str::to_string)
            .collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Whitespace word count of the original text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
