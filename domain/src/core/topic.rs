//! Topic value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The product or service a slogan is generated for (Value Object)
///
/// Stored trimmed. A topic is never blank and never longer than
/// [`Topic::MAX_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic {
    content: String,
}

impl Topic {
    /// Maximum topic length in characters
    pub const MAX_CHARS: usize = 1000;

    /// Create a topic, trimming surrounding whitespace
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidTopic(
                "topic cannot be empty".to_string(),
            ));
        }
        let len = trimmed.chars().count();
        if len > Self::MAX_CHARS {
            return Err(DomainError::InvalidTopic(format!(
                "topic is {} characters, at most {} allowed",
                len,
                Self::MAX_CHARS
            )));
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    /// Get the topic content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Topic {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Topic::new(s)
    }
}

impl TryFrom<&str> for Topic {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Topic::new(s)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.content
    }
}
