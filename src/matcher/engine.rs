//! Response matching engine.
//!
//! `respond` never fails: store errors are logged and degrade to "no
//! match" so the caller can fall back to the default reply. A bot that
//! answers generically beats one that crashes on unusual input.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::analysis::analyzer::{Analyzer, MessageAnalysis};
use crate::config::MatcherConfig;
use crate::error::MatchError;
use crate::matcher::personalize::personalize;
use crate::matcher::similarity::blended_similarity;
use crate::rules::model::{Channel, Rule};
use crate::rules::store::RuleStore;

/// Weight of the blended text similarity in the fuzzy composite score.
const SIMILARITY_WEIGHT: f64 = 0.5;
/// Weight of the literal-keyword bonus.
const KEYWORD_WEIGHT: f64 = 0.4;
/// Weight of the priority bonus (priority scaled by 1/100, unclamped).
const PRIORITY_WEIGHT: f64 = 0.1;

/// Which pipeline stage produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    Exact,
    Fuzzy,
}

/// A successful match, personalized and ready to send.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedReply {
    pub rule_id: Uuid,
    pub stage: MatchStage,
    /// Composite fuzzy score; 1.0 for an exact hit.
    pub score: f64,
    pub reply: String,
    pub analysis: MessageAnalysis,
}

/// Stateless matching engine over a shared rule store.
pub struct ResponseMatcher {
    store: Arc<dyn RuleStore>,
    analyzer: Analyzer,
    config: MatcherConfig,
}

impl ResponseMatcher {
    pub fn new(store: Arc<dyn RuleStore>) -> Self {
        Self::with_config(store, MatcherConfig::default())
    }

    pub fn with_config(store: Arc<dyn RuleStore>, config: MatcherConfig) -> Self {
        Self {
            store,
            analyzer: Analyzer::new(),
            config,
        }
    }

    /// The analyzer backing this matcher, for callers that also want
    /// standalone analysis.
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Find and personalize a reply for inbound text. Never fails.
    pub async fn respond(&self, text: &str, channel: Channel) -> Option<String> {
        match self.evaluate(text, channel).await {
            Ok(matched) => matched.map(|m| m.reply),
            Err(e) => {
                warn!(error = %e, channel = %channel, "Matching failed, degrading to no match");
                None
            }
        }
    }

    /// `respond`, substituting the configured default reply on no match.
    pub async fn respond_or_default(&self, text: &str, channel: Channel) -> String {
        match self.respond(text, channel).await {
            Some(reply) => reply,
            None => self.config.default_reply.clone(),
        }
    }

    /// Error-transparent form of `respond`, exposing stage and score.
    ///
    /// Empty or whitespace-only text is a defined no-match, returned
    /// before the store is touched.
    pub async fn evaluate(
        &self,
        text: &str,
        channel: Channel,
    ) -> Result<Option<MatchedReply>, MatchError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let rules = self.store.active_rules_for(channel).await?;

        let hit = self
            .exact_pass(text, &rules)
            .or_else(|| self.fuzzy_pass(text, &rules));

        Ok(hit.map(|(rule, stage, score)| {
            let analysis = self.analyzer.analyze(text);
            let reply = personalize(&rule.template, &analysis);
            debug!(rule_id = %rule.id, stage = ?stage, score, "Reply matched");
            MatchedReply {
                rule_id: rule.id,
                stage,
                score,
                reply,
                analysis,
            }
        }))
    }

    /// Stage 1: literal keyword containment against the lower-cased,
    /// trimmed message. Rule order (priority descending) then keyword
    /// order decide ties. Containment subsumes the whole-word case, so a
    /// short keyword matches inside longer words — rule authors should
    /// keep keywords at three characters or more.
    fn exact_pass<'a>(
        &self,
        text: &str,
        rules: &'a [Rule],
    ) -> Option<(&'a Rule, MatchStage, f64)> {
        let message = text.to_lowercase();
        let message = message.trim();
        for rule in rules {
            for keyword in rule.keywords() {
                if message.contains(keyword.as_str()) {
                    debug!(rule_id = %rule.id, keyword = %keyword, "Exact keyword hit");
                    return Some((rule, MatchStage::Exact, 1.0));
                }
            }
        }
        None
    }

    /// Stage 2: composite similarity over every fetched rule; the best
    /// score wins if it clears the threshold. Strictly-greater comparison
    /// keeps the earlier (higher-priority) rule on ties.
    fn fuzzy_pass<'a>(
        &self,
        text: &str,
        rules: &'a [Rule],
    ) -> Option<(&'a Rule, MatchStage, f64)> {
        let processed = self.analyzer.normalizer().preprocess(text);
        let mut best: Option<(&Rule, f64)> = None;
        for rule in rules {
            let score = self.score_rule(&processed, rule);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((rule, score));
            }
        }

        let (rule, score) = best?;
        if score >= self.config.fuzzy_threshold {
            debug!(rule_id = %rule.id, score, "Fuzzy match above threshold");
            Some((rule, MatchStage::Fuzzy, score))
        } else {
            debug!(
                best_score = score,
                threshold = self.config.fuzzy_threshold,
                "Best fuzzy score below threshold"
            );
            None
        }
    }

    /// Composite fuzzy score of one rule against the processed message:
    /// `0.5·blended_similarity + 0.4·keyword_bonus + 0.1·priority/100`.
    ///
    /// The token Jaccard overlap contributes inside `blended_similarity`;
    /// the 0.4 term is the literal-keyword bonus. The priority term is
    /// deliberately unclamped.
    pub(crate) fn score_rule(&self, processed: &str, rule: &Rule) -> f64 {
        let similarity =
            blended_similarity(self.analyzer.normalizer(), processed, &rule.trigger_keywords);
        let keyword_bonus = if rule
            .keywords()
            .iter()
            .any(|kw| processed.contains(kw.as_str()))
        {
            1.0
        } else {
            0.0
        };

        similarity * SIMILARITY_WEIGHT
            + keyword_bonus * KEYWORD_WEIGHT
            + (f64::from(rule.priority) / 100.0) * PRIORITY_WEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::error::StoreError;
    use crate::rules::model::RuleChannel;
    use crate::rules::store::MemoryRuleStore;

    fn rule(keywords: &str, template: &str, channel: RuleChannel, priority: i32) -> Rule {
        Rule::new(keywords, template, channel, priority).unwrap()
    }

    #[tokio::test]
    async fn empty_input_never_matches() {
        let store = MemoryRuleStore::with_rules(vec![rule(
            "bonjour",
            "Bienvenue",
            RuleChannel::Message,
            1,
        )]);
        let matcher = ResponseMatcher::new(store);

        assert!(matcher.respond("", Channel::Message).await.is_none());
        assert!(matcher.respond("   \t ", Channel::Message).await.is_none());
    }

    #[tokio::test]
    async fn exact_pass_prefers_higher_priority() {
        let low = rule("merci", "low priority", RuleChannel::Message, 1);
        let high = rule("merci", "high priority", RuleChannel::Message, 10);
        let store = MemoryRuleStore::with_rules(vec![low, high.clone()]);
        let matcher = ResponseMatcher::new(store);

        let matched = matcher
            .evaluate("merci pour tout", Channel::Message)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(matched.rule_id, high.id);
        assert_eq!(matched.stage, MatchStage::Exact);
        assert!(matched.reply.contains("high priority"));
    }

    #[tokio::test]
    async fn equal_priority_ties_go_to_first_created() {
        let first = rule("salut", "greeting", RuleChannel::Message, 5);
        let second = rule("prix", "pricing", RuleChannel::Message, 5);
        let store = MemoryRuleStore::with_rules(vec![first.clone(), second]);
        let matcher = ResponseMatcher::new(store);

        // Both keywords appear; the first rule in creation order wins the tie.
        let matched = matcher
            .evaluate("salut, quel prix ?", Channel::Message)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(matched.rule_id, first.id);
    }

    // Containment is deliberately permissive: "si" hits inside "possible".
    #[tokio::test]
    async fn short_keywords_match_inside_words() {
        let store = MemoryRuleStore::with_rules(vec![rule("si", "oui", RuleChannel::Message, 1)]);
        let matcher = ResponseMatcher::new(store);

        let matched = matcher
            .evaluate("est-ce possible", Channel::Message)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(matched.stage, MatchStage::Exact);
    }

    #[tokio::test]
    async fn channel_scope_is_respected() {
        let store = MemoryRuleStore::with_rules(vec![rule(
            "bonjour",
            "dm only",
            RuleChannel::Message,
            1,
        )]);
        let matcher = ResponseMatcher::new(store);

        assert!(matcher.respond("bonjour", Channel::Comment).await.is_none());
        assert!(matcher.respond("bonjour", Channel::Message).await.is_some());
    }

    #[tokio::test]
    async fn fuzzy_threshold_boundary() {
        // With zero similarity and no keyword hit, the score reduces to the
        // priority term: priority 300 reaches the 0.3 floor, 299 stays under.
        let selected = rule("aaa", "priorité haute", RuleChannel::Message, 300);
        let store = MemoryRuleStore::with_rules(vec![selected.clone()]);
        let matcher = ResponseMatcher::new(store);

        let matched = matcher
            .evaluate("zzz", Channel::Message)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(matched.rule_id, selected.id);
        assert_eq!(matched.stage, MatchStage::Fuzzy);
        assert!(matched.score >= 0.3);

        let store = MemoryRuleStore::with_rules(vec![rule(
            "aaa",
            "priorité basse",
            RuleChannel::Message,
            299,
        )]);
        let matcher = ResponseMatcher::new(store);
        assert!(matcher.evaluate("zzz", Channel::Message).await.unwrap().is_none());
    }

    // Pins the composite formula: similarity (with its internal Jaccard
    // blend) at 0.5, keyword bonus at 0.4, priority/100 at 0.1.
    #[tokio::test]
    async fn fuzzy_score_formula_regression() {
        let scored = rule("prix,tarif", "Nos tarifs débutent à 10€.", RuleChannel::Both, 5);
        let store = MemoryRuleStore::with_rules(vec![scored.clone()]);
        let matcher = ResponseMatcher::new(store);

        let processed = matcher.analyzer().normalizer().preprocess("vos tarfis svp");
        let expected = blended_similarity(
            matcher.analyzer().normalizer(),
            &processed,
            &scored.trigger_keywords,
        ) * 0.5
            + 0.0 * 0.4
            + (5.0 / 100.0) * 0.1;

        let score = matcher.score_rule(&processed, &scored);
        assert!((score - expected).abs() < 1e-12);
    }

    #[tokio::test]
    async fn fuzzy_tie_keeps_higher_priority_rule() {
        // Identical keywords and equal priorities: the first fetched rule
        // (creation order) must win the tie deterministically.
        let first = rule("délai livraison", "first", RuleChannel::Message, 5);
        let second = rule("délai livraison", "second", RuleChannel::Message, 5);
        let store = MemoryRuleStore::with_rules(vec![first.clone(), second]);
        let matcher = ResponseMatcher::new(store);

        // "délai de livraison" never contains the keyword literally, so the
        // exact pass falls through and the fuzzy score decides.
        let matched = matcher
            .evaluate("délai de livraison ?", Channel::Message)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(matched.stage, MatchStage::Fuzzy);
        assert_eq!(matched.rule_id, first.id);
    }

    #[tokio::test]
    async fn no_rules_means_no_match() {
        let matcher = ResponseMatcher::new(MemoryRuleStore::new());
        assert!(matcher.respond("bonjour", Channel::Message).await.is_none());
    }

    #[tokio::test]
    async fn default_reply_substituted_on_no_match() {
        let matcher = ResponseMatcher::new(MemoryRuleStore::new());
        assert_eq!(
            matcher.respond_or_default("bonjour", Channel::Message).await,
            crate::config::DEFAULT_REPLY
        );
    }

    struct FailingStore;

    #[async_trait]
    impl RuleStore for FailingStore {
        async fn active_rules_for(&self, _channel: Channel) -> Result<Vec<Rule>, StoreError> {
            Err(StoreError::Backend("connection lost".into()))
        }
    }

    #[tokio::test]
    async fn store_failure_degrades_to_no_match() {
        let matcher = ResponseMatcher::new(Arc::new(FailingStore));

        assert!(matcher.respond("bonjour", Channel::Message).await.is_none());
        assert_eq!(
            matcher.respond_or_default("bonjour", Channel::Message).await,
            crate::config::DEFAULT_REPLY
        );

        // The transparent form surfaces the error instead.
        let err = matcher.evaluate("bonjour", Channel::Message).await.unwrap_err();
        assert!(matches!(err, MatchError::Store(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn determinism_same_input_same_output() {
        let store = MemoryRuleStore::with_rules(vec![
            rule("bonjour,salut", "Bonjour, bienvenue!", RuleChannel::Message, 10),
            rule("prix,tarif", "Nos tarifs débutent à 10€.", RuleChannel::Both, 5),
        ]);
        let matcher = ResponseMatcher::new(store);

        let a = matcher.respond("Bonjour, quel est le prix?", Channel::Message).await;
        let b = matcher.respond("Bonjour, quel est le prix?", Channel::Message).await;
        assert_eq!(a, b);
    }
}
