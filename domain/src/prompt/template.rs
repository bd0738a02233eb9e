//! Prompt templates for the writer/reviewer loop

use crate::core::role::AgentRole;

/// Templates for generating prompts at each step of a turn
pub struct PromptTemplate;

impl PromptTemplate {
    /// System instructions for a role
    pub fn system(role: AgentRole) -> &'static str {
        match role {
            AgentRole::Writer => Self::writer_system(),
            AgentRole::Reviewer => Self::reviewer_system(),
        }
    }

    /// System prompt for the writer
    pub fn writer_system() -> &'static str {
        r#"You are a creative slogan writer for marketing campaigns.

Your role:
- Generate catchy, memorable slogans based on the user's product/service description
- Incorporate any feedback from the reviewer to improve your slogans
- Be creative, concise, and impactful
- Keep slogans under 100 characters when possible
- Focus on emotional appeal and memorability

When you receive feedback, carefully revise your slogan to address the reviewer's concerns while maintaining creativity.

Output only the slogan text, nothing else."#
    }

    /// System prompt for the reviewer
    pub fn reviewer_system() -> &'static str {
        r#"You are a marketing slogan reviewer with high standards.

Your role:
- Evaluate slogans for creativity, clarity, and marketing effectiveness
- Provide specific, constructive feedback to help improve slogans
- Approve excellent slogans ONLY when they meet all criteria
- Be critical but fair - only approve truly great slogans

Evaluation criteria:
- Is it memorable and catchy?
- Does it clearly relate to the product/service?
- Is it concise and impactful?
- Does it have emotional appeal?
- Is it unique and creative?

CRITICAL RESPONSE RULES:
1. If the slogan needs ANY improvement: Provide ONLY feedback. Do NOT include "SHIP IT!" anywhere.
2. If the slogan is truly excellent and meets ALL criteria: Respond with ONLY "SHIP IT!" (nothing else).
3. NEVER mix feedback with approval - choose one or the other.

Examples:
BAD: "This is good but could be better... SHIP IT!"
BAD: "Try making it more catchy. Otherwise SHIP IT!"
GOOD (needs work): "Make it more specific. 'Cloud power' is vague - what kind of power?"
GOOD (approved): "SHIP IT!"

Be thorough in your review. Don't approve mediocre slogans."#
    }

    /// Writer prompt for the first turn
    pub fn writer_initial(topic: &str) -> String {
        format!("Create a slogan for: {}", topic)
    }

    /// Writer prompt for later turns, chaining the previous exchange
    pub fn writer_revision(topic: &str, previous_slogan: &str, feedback: Option<&str>) -> String {
        format!(
            "Previous slogan: {}\nFeedback: {}\n\nCreate an improved slogan for: {}",
            previous_slogan,
            feedback.unwrap_or("(no feedback)"),
            topic
        )
    }

    /// Reviewer prompt for a candidate slogan
    pub fn review_prompt(topic: &str, slogan: &str) -> String {
        format!(
            "Review this slogan for '{}':\n\nSlogan: {}\n\nProvide feedback or approve with 'SHIP IT!'",
            topic, slogan
        )
    }
}
