//! Conversation-level aggregations for the dashboard layer.
//!
//! Pure functions over already-collected message texts; fetching the
//! texts (and any time-window filtering) is the caller's concern.

use serde::Serialize;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::intent::Intent;
use crate::analysis::sentiment::Sentiment;

/// Aggregate view over a set of recent messages.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationInsights {
    pub total_messages: usize,
    pub average_sentiment: Sentiment,
    /// Mean polarity-adjusted satisfaction, rounded to two decimals.
    pub sentiment_score: f64,
    /// Up to three most frequent intents, ties in first-seen order.
    pub main_intents: Vec<Intent>,
    pub satisfaction_score: f64,
}

/// Summarize sentiment and intents across a conversation.
pub fn conversation_insights<S: AsRef<str>>(
    analyzer: &Analyzer,
    messages: &[S],
) -> ConversationInsights {
    if messages.is_empty() {
        return ConversationInsights {
            total_messages: 0,
            average_sentiment: Sentiment::Neutre,
            sentiment_score: 0.5,
            main_intents: Vec::new(),
            satisfaction_score: 0.5,
        };
    }

    let mut score_sum = 0.0;
    let mut intent_counts: Vec<(Intent, usize)> = Vec::new();
    for message in messages {
        let analysis = analyzer.analyze(message.as_ref());
        // Fold polarity into the confidence so negative messages pull the
        // average down instead of up: 0.5 is neutral on both sides.
        score_sum += match analysis.sentiment.label {
            Sentiment::Negatif => 1.0 - analysis.sentiment.score,
            _ => analysis.sentiment.score,
        };
        match intent_counts.iter_mut().find(|(i, _)| *i == analysis.intent) {
            Some((_, n)) => *n += 1,
            None => intent_counts.push((analysis.intent, 1)),
        }
    }

    let average = score_sum / messages.len() as f64;
    let average_sentiment = if average > 0.6 {
        Sentiment::Positif
    } else if average < 0.4 {
        Sentiment::Negatif
    } else {
        Sentiment::Neutre
    };

    // Stable sort keeps first-seen order among equal counts.
    intent_counts.sort_by(|a, b| b.1.cmp(&a.1));
    let main_intents = intent_counts.iter().take(3).map(|(i, _)| *i).collect();

    let rounded = round2(average);
    ConversationInsights {
        total_messages: messages.len(),
        average_sentiment,
        sentiment_score: rounded,
        main_intents,
        satisfaction_score: rounded,
    }
}

/// Per-label sentiment counts over a message set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentBreakdown {
    pub positif: usize,
    pub negatif: usize,
    pub neutre: usize,
}

impl SentimentBreakdown {
    pub fn total(&self) -> usize {
        self.positif + self.negatif + self.neutre
    }

    /// Share of `label` in percent, one decimal; 0.0 on an empty set.
    pub fn percentage(&self, label: Sentiment) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let count = match label {
            Sentiment::Positif => self.positif,
            Sentiment::Negatif => self.negatif,
            Sentiment::Neutre => self.neutre,
        };
        round1(count as f64 / total as f64 * 100.0)
    }
}

/// Count sentiment labels across messages.
pub fn sentiment_breakdown<S: AsRef<str>>(analyzer: &Analyzer, messages: &[S]) -> SentimentBreakdown {
    let mut breakdown = SentimentBreakdown::default();
    for message in messages {
        match analyzer.sentiment(message.as_ref()).label {
            Sentiment::Positif => breakdown.positif += 1,
            Sentiment::Negatif => breakdown.negatif += 1,
            Sentiment::Neutre => breakdown.neutre += 1,
        }
    }
    breakdown
}

/// Frequency of one detected intent.
#[derive(Debug, Clone, Serialize)]
pub struct IntentStat {
    pub intent: Intent,
    pub count: usize,
    pub percentage: f64,
}

/// Detected intents across messages, most frequent first; ties keep
/// first-seen order.
pub fn intent_breakdown<S: AsRef<str>>(analyzer: &Analyzer, messages: &[S]) -> Vec<IntentStat> {
    let mut counts: Vec<(Intent, usize)> = Vec::new();
    for message in messages {
        let intent = analyzer.intent(message.as_ref());
        match counts.iter_mut().find(|(i, _)| *i == intent) {
            Some((_, n)) => *n += 1,
            None => counts.push((intent, 1)),
        }
    }
    if counts.is_empty() {
        return Vec::new();
    }

    let total: usize = counts.iter().map(|(_, n)| n).sum();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(intent, count)| IntentStat {
            intent,
            count,
            percentage: round1(count as f64 / total as f64 * 100.0),
        })
        .collect()
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
