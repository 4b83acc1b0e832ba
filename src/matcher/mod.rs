//! Three-stage response matching pipeline.
//!
//! 1. exact pass — literal keyword containment, rule/keyword order wins
//! 2. fuzzy fallback — composite similarity score with a 0.3 floor
//! 3. personalization — sentiment prefix and intent suffix around the
//!    rule template

pub mod engine;
pub mod personalize;
pub mod similarity;

pub use engine::{MatchStage, MatchedReply, ResponseMatcher};
