//! Configuration types.

/// Fixed reply substituted when no rule matches.
pub const DEFAULT_REPLY: &str =
    "Merci pour votre message. Notre équipe vous répondra dans les plus brefs délais.";

/// Matcher configuration.
///
/// Scoring weights and classifier tables are compile-time constants, not
/// knobs — only the acceptance threshold and the fallback reply vary per
/// deployment.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Minimum composite score for the fuzzy fallback to accept a rule.
    pub fuzzy_threshold: f64,
    /// Reply returned by `respond_or_default` when nothing matches.
    pub default_reply: String,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.3,
            default_reply: DEFAULT_REPLY.to_string(),
        }
    }
}
