//! Rule records and channel scoping.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RuleError;

/// Surface an inbound text arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Private Messenger message.
    Message,
    /// Public feed comment.
    Comment,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, RuleError> {
        match s {
            "message" => Ok(Self::Message),
            "comment" => Ok(Self::Comment),
            other => Err(RuleError::InvalidChannel(other.to_string())),
        }
    }
}

/// Channel scope of a rule. `Both` applies to either inbound surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleChannel {
    Message,
    Comment,
    Both,
}

impl RuleChannel {
    pub fn applies_to(&self, channel: Channel) -> bool {
        match self {
            Self::Both => true,
            Self::Message => channel == Channel::Message,
            Self::Comment => channel == Channel::Comment,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Comment => "comment",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for RuleChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleChannel {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, RuleError> {
        match s {
            "message" => Ok(Self::Message),
            "comment" => Ok(Self::Comment),
            "both" => Ok(Self::Both),
            other => Err(RuleError::InvalidChannel(other.to_string())),
        }
    }
}

/// A stored trigger-keywords → reply-template mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: Uuid,
    /// Raw comma-joined keyword string as configured by the admin layer.
    pub trigger_keywords: String,
    /// Reply text, personalized at match time.
    pub template: String,
    pub channel: RuleChannel,
    /// Higher priority wins when several rules could match.
    pub priority: i32,
    pub active: bool,
    /// Creation time; also the stable secondary ordering key.
    pub created_at: DateTime<Utc>,
}

impl Rule {
    /// Build an active rule, validating that at least one usable keyword
    /// survives parsing.
    pub fn new(
        trigger_keywords: impl Into<String>,
        template: impl Into<String>,
        channel: RuleChannel,
        priority: i32,
    ) -> Result<Self, RuleError> {
        let rule = Self {
            id: Uuid::new_v4(),
            trigger_keywords: trigger_keywords.into(),
            template: template.into(),
            channel,
            priority,
            active: true,
            created_at: Utc::now(),
        };
        if rule.keywords().is_empty() {
            return Err(RuleError::EmptyKeywords);
        }
        Ok(rule)
    }

    /// Parsed trigger phrases: comma-split, trimmed, lower-cased, empties
    /// dropped.
    pub fn keywords(&self) -> Vec<String> {
        self.trigger_keywords
            .split(',')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

/// Partial update applied to an existing rule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulePatch {
    pub trigger_keywords: Option<String>,
    pub template: Option<String>,
    pub channel: Option<RuleChannel>,
    pub priority: Option<i32>,
    pub active: Option<bool>,
}
