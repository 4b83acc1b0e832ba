//! Lexicon-based sentiment scoring.

use serde::{Deserialize, Serialize};

const POSITIVE_WORDS: &[&str] = &[
    "super", "génial", "excellent", "parfait", "bien", "bon", "content", "satisfait", "merci",
    "top",
];

const NEGATIVE_WORDS: &[&str] = &[
    "mauvais", "nul", "horrible", "problème", "erreur", "déçu", "arnaque", "pourri",
    "pas content",
];

/// Coarse polarity of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positif,
    Negatif,
    Neutre,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positif => "positif",
            Self::Negatif => "negatif",
            Self::Neutre => "neutre",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment label with its confidence score and raw lexicon counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: Sentiment,
    /// Confidence in [0,1]; 0.5 for neutral.
    pub score: f64,
    pub positive_words: usize,
    pub negative_words: usize,
}

/// Counts token membership against the fixed word lists.
#[derive(Debug)]
pub struct SentimentAnalyzer {
    positive: &'static [&'static str],
    negative: &'static [&'static str],
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            positive: POSITIVE_WORDS,
            negative: NEGATIVE_WORDS,
        }
    }

    /// Score tokens against the word lists.
    ///
    /// The `+ 1` denominator never divides by zero and never reaches 1.0.
    pub fn score(&self, tokens: &[String]) -> SentimentScore {
        let positive = tokens
            .iter()
            .filter(|t| self.positive.contains(&t.as_str()))
            .count();
        let negative = tokens
            .iter()
            .filter(|t| self.negative.contains(&t.as_str()))
            .count();

        let (label, score) = if positive > negative {
            (Sentiment::Positif, positive as f64 / (positive + negative + 1) as f64)
        } else if negative > positive {
            (Sentiment::Negatif, negative as f64 / (positive + negative + 1) as f64)
        } else {
            (Sentiment::Neutre, 0.5)
        };

        SentimentScore {
            label,
            score,
            positive_words: positive,
            negative_words: negative,
        }
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
