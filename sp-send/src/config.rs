//! Sender configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What to do when `t_k` is not a valid scalar (zero, or not below the curve order).
///
/// With SHA-256 this happens with negligible probability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidTweakPolicy {
    /// Fail the whole call.
    #[default]
    Abort,
    /// Move on to `k + 1` for the same recipient. Later recipients of the group continue from
    /// the advanced counter.
    SkipIndex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SenderConfig {
    pub invalid_tweak: InvalidTweakPolicy,
    /// Derive recipient groups on the rayon thread pool. Ignored without the `parallel` feature.
    pub parallel: bool,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            invalid_tweak: InvalidTweakPolicy::Abort,
            parallel: true,
        }
    }
}

impl SenderConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_invalid_tweak(mut self, policy: InvalidTweakPolicy) -> Self {
        self.invalid_tweak = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
