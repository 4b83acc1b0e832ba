//! Rule storage — the read seam the matcher consumes, plus the in-memory
//! backend carrying the administrative mutations.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, RuleError, StoreError};
use crate::rules::model::{Channel, Rule, RuleChannel, RulePatch};

/// Read-only view the matcher depends on.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Active rules applying to `channel`, priority descending; ties keep
    /// creation order so results are deterministic.
    async fn active_rules_for(&self, channel: Channel) -> Result<Vec<Rule>, StoreError>;
}

/// In-memory rule table.
///
/// Reads snapshot under a read lock: a rule added mid-match may or may not
/// be visible to an in-flight call, and no cross-call ordering is promised.
pub struct MemoryRuleStore {
    rules: RwLock<Vec<Rule>>,
}

impl MemoryRuleStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rules: RwLock::new(Vec::new()),
        })
    }

    /// Seed a store; insertion order is the tie-break order.
    pub fn with_rules(rules: Vec<Rule>) -> Arc<Self> {
        Arc::new(Self {
            rules: RwLock::new(rules),
        })
    }

    /// Insert a new rule.
    pub async fn create(
        &self,
        trigger_keywords: &str,
        template: &str,
        channel: RuleChannel,
        priority: i32,
    ) -> Result<Rule, RuleError> {
        let rule = Rule::new(trigger_keywords, template, channel, priority)?;
        info!(
            rule_id = %rule.id,
            channel = %rule.channel,
            priority = rule.priority,
            "Rule created"
        );
        self.rules.write().await.push(rule.clone());
        Ok(rule)
    }

    /// Apply a partial update. The patched rule must still carry at least
    /// one usable keyword.
    pub async fn update(&self, id: Uuid, patch: RulePatch) -> Result<Rule, Error> {
        let mut rules = self.rules.write().await;
        let slot = rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })?;

        let mut updated = slot.clone();
        if let Some(trigger_keywords) = patch.trigger_keywords {
            updated.trigger_keywords = trigger_keywords;
        }
        if let Some(template) = patch.template {
            updated.template = template;
        }
        if let Some(channel) = patch.channel {
            updated.channel = channel;
        }
        if let Some(priority) = patch.priority {
            updated.priority = priority;
        }
        if let Some(active) = patch.active {
            updated.active = active;
        }
        if updated.keywords().is_empty() {
            return Err(RuleError::EmptyKeywords.into());
        }

        *slot = updated.clone();
        debug!(rule_id = %id, "Rule updated");
        Ok(updated)
    }

    /// Remove a rule.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut rules = self.rules.write().await;
        let before = rules.len();
        rules.retain(|r| r.id != id);
        if rules.len() == before {
            return Err(StoreError::NotFound { id });
        }
        info!(rule_id = %id, "Rule deleted");
        Ok(())
    }

    /// Toggle visibility to the matcher.
    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<(), StoreError> {
        let mut rules = self.rules.write().await;
        let rule = rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })?;
        rule.active = active;
        info!(rule_id = %id, active, "Rule toggled");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Option<Rule> {
        self.rules.read().await.iter().find(|r| r.id == id).cloned()
    }

    pub async fn all(&self) -> Vec<Rule> {
        self.rules.read().await.clone()
    }
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    async fn active_rules_for(&self, channel: Channel) -> Result<Vec<Rule>, StoreError> {
        let rules = self.rules.read().await;
        let mut matching: Vec<Rule> = rules
            .iter()
            .filter(|r| r.active && r.channel.applies_to(channel))
            .cloned()
            .collect();
        // Stable sort: equal priorities keep insertion order.
        matching.sort_by(|a, b| b.priority.cmp(&a.priority));
        debug!(channel = %channel, count = matching.len(), "Fetched active rules");
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn orders_by_priority_descending() {
        let store = MemoryRuleStore::new();
        store.create("bonjour", "low", RuleChannel::Message, 1).await.unwrap();
        store.create("salut", "high", RuleChannel::Message, 10).await.unwrap();

        let rules = store.active_rules_for(Channel::Message).await.unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].template, "high");
        assert_eq!(rules[1].template, "low");
    }

    #[tokio::test]
    async fn equal_priorities_keep_creation_order() {
        let store = MemoryRuleStore::new();
        let first = store.create("a", "first", RuleChannel::Both, 5).await.unwrap();
        let second = store.create("b", "second", RuleChannel::Both, 5).await.unwrap();

        let rules = store.active_rules_for(Channel::Message).await.unwrap();
        assert_eq!(rules[0].id, first.id);
        assert_eq!(rules[1].id, second.id);
    }

    #[tokio::test]
    async fn filters_inactive_rules() {
        let store = MemoryRuleStore::new();
        let rule = store.create("bonjour", "x", RuleChannel::Message, 1).await.unwrap();
        store.set_active(rule.id, false).await.unwrap();

        assert!(store.active_rules_for(Channel::Message).await.unwrap().is_empty());

        store.set_active(rule.id, true).await.unwrap();
        assert_eq!(store.active_rules_for(Channel::Message).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn filters_by_channel_scope() {
        let store = MemoryRuleStore::new();
        store.create("dm", "dm only", RuleChannel::Message, 1).await.unwrap();
        store.create("pub", "comment only", RuleChannel::Comment, 1).await.unwrap();
        store.create("tous", "everywhere", RuleChannel::Both, 1).await.unwrap();

        let messages = store.active_rules_for(Channel::Message).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|r| r.template != "comment only"));

        let comments = store.active_rules_for(Channel::Comment).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert!(comments.iter().all(|r| r.template != "dm only"));
    }

    #[tokio::test]
    async fn create_rejects_empty_keywords() {
        let store = MemoryRuleStore::new();
        let err = store.create(" , ", "x", RuleChannel::Both, 0).await.unwrap_err();
        assert!(matches!(err, RuleError::EmptyKeywords));
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn update_patches_fields() {
        let store = MemoryRuleStore::new();
        let rule = store.create("prix", "old", RuleChannel::Message, 1).await.unwrap();

        let updated = store
            .update(
                rule.id,
                RulePatch {
                    template: Some("new".into()),
                    priority: Some(7),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.template, "new");
        assert_eq!(updated.priority, 7);
        assert_eq!(updated.trigger_keywords, "prix");
        assert_eq!(store.get(rule.id).await.unwrap().template, "new");
    }

    #[tokio::test]
    async fn update_rejects_empty_keywords_and_keeps_rule_intact() {
        let store = MemoryRuleStore::new();
        let rule = store.create("prix", "x", RuleChannel::Message, 1).await.unwrap();

        let patch = RulePatch {
            trigger_keywords: Some(" , ".into()),
            ..Default::default()
        };
        assert!(store.update(rule.id, patch).await.is_err());
        assert_eq!(store.get(rule.id).await.unwrap().trigger_keywords, "prix");
    }

    #[tokio::test]
    async fn update_missing_rule_is_not_found() {
        let store = MemoryRuleStore::new();
        let err = store.update(Uuid::new_v4(), RulePatch::default()).await.unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_removes_rule() {
        let store = MemoryRuleStore::new();
        let rule = store.create("bonjour", "x", RuleChannel::Both, 0).await.unwrap();

        store.delete(rule.id).await.unwrap();
        assert!(store.get(rule.id).await.is_none());
        assert!(matches!(
            store.delete(rule.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }
}
