//! Trigger rules and their storage.

pub mod model;
pub mod store;

pub use model::{Channel, Rule, RuleChannel, RulePatch};
pub use store::{MemoryRuleStore, RuleStore};
