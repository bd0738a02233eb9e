//! Roles in the writer/reviewer collaboration

use serde::{Deserialize, Serialize};

/// Role a responder plays in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Proposes a candidate slogan
    Writer,
    /// Critiques or approves the candidate
    Reviewer,
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Writer => "writer",
            AgentRole::Reviewer => "reviewer",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
