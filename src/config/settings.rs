use serde::{Deserialize, Serialize};

/// What happens to pending regions when a whole-document rewrite is applied
/// over them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacePolicy {
    /// Drop them without touching the text they cover.
    #[default]
    Discard,
    /// Reject them first, restoring their original text, so the new
    /// region's snapshot is the document as it was before any proposal.
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineSettings {
    pub replace_policy: ReplacePolicy,
    /// `env_logger` filter used by the binary when `RUST_LOG` is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl EngineSettings {
    pub fn with_replace_policy(mut self, policy: ReplacePolicy) -> Self {
        self.replace_policy = policy;
        self
    }
}
