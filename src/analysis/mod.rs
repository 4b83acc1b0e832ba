//! Lexical analysis: normalization, intent and sentiment classification,
//! conversation-level aggregates.

pub mod analyzer;
pub mod insights;
pub mod intent;
pub mod sentiment;
pub mod text;

pub use analyzer::{Analyzer, MessageAnalysis};
pub use intent::Intent;
pub use sentiment::{Sentiment, SentimentScore};
