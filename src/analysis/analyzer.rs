//! Combined per-message analysis.

use serde::Serialize;

use crate::analysis::intent::{Intent, IntentClassifier};
use crate::analysis::sentiment::{SentimentAnalyzer, SentimentScore};
use crate::analysis::text::{self, TextNormalizer};

/// Everything derived from one inbound text. Lives for the duration of a
/// match call (or one dashboard query) and is discarded afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct MessageAnalysis {
    pub original: String,
    pub processed: String,
    pub tokens: Vec<String>,
    pub intent: Intent,
    pub sentiment: SentimentScore,
    pub word_count: usize,
}

/// Owns the classifier tables. Immutable after construction, safe to share
/// across concurrent inbound-event handlers.
#[derive(Debug)]
pub struct Analyzer {
    normalizer: TextNormalizer,
    intents: IntentClassifier,
    lexicon: SentimentAnalyzer,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            intents: IntentClassifier::new(),
            lexicon: SentimentAnalyzer::new(),
        }
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Intent of raw text.
    pub fn intent(&self, text: &str) -> Intent {
        self.intents.classify(text)
    }

    /// Sentiment of raw text (tokenized internally).
    pub fn sentiment(&self, text: &str) -> SentimentScore {
        self.lexicon.score(&self.normalizer.tokenize(text))
    }

    /// Full analysis of one message.
    pub fn analyze(&self, message: &str) -> MessageAnalysis {
        let processed = self.normalizer.preprocess(message);
        MessageAnalysis {
            original: message.to_string(),
            tokens: self.normalizer.tokenize(&processed),
            intent: self.intents.classify(message),
            sentiment: self.sentiment(message),
            word_count: text::word_count(message),
            processed,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}
