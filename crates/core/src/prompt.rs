//! Prompt construction for the chat and medicine paths.
//!
//! Both paths send exactly two messages: a fixed system instruction followed by the user
//! content. Sampling parameters are fixed per path.

use hai_types::{MedicineName, NonEmptyText};
use serde::{Deserialize, Serialize};

/// System instruction for general healthcare questions.
pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful healthcare assistant. \
When a user asks a question, first give a short definition/explanation in one paragraph. \
Then, give numbered precautions or tips in plain text (no markdown, no stars). \
Keep it clear, factual, and easy to read.";

/// System instruction for medicine lookups. Asks for the JSON schema the normalizer completes.
pub const MEDICINE_SYSTEM_PROMPT: &str = "You are a pharmacist assistant. \
Based on the medicine name provided, give general information about the medicine. \
Provide a concise, **general** info summary WITHOUT dosing: \
• Indications (what it's for) \
• Who should avoid (contraindications) \
• Common side effects \
• Serious warnings (black-box or high risk) \
• Interactions (big ones only) \
• Pregnancy/Lactation caution \
• Schedule/OTC note (if region-agnostic) \
Always add: 'Educational use only - consult a doctor/pharmacist.' \
Return JSON only in this schema: \
{name:'', generic:'', strength:'', form:'', indications:'', contraindications:'', \
side_effects:'', warnings:'', interactions:'', pregnancy:'', schedule:'', note:''}";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling parameters sent alongside the messages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

pub const CHAT_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.2,
    max_tokens: 400,
};

pub const MEDICINE_SAMPLING: SamplingParams = SamplingParams {
    temperature: 0.1,
    max_tokens: 500,
};

/// A model-agnostic chat-completion request. The client supplies the model identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub sampling: SamplingParams,
}

impl CompletionRequest {
    fn new(system: &str, user: String, sampling: SamplingParams) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            sampling,
        }
    }
}

/// Build the chat-path request for a user question.
pub fn build_chat_prompt(question: &NonEmptyText) -> CompletionRequest {
    CompletionRequest::new(CHAT_SYSTEM_PROMPT, question.to_string(), CHAT_SAMPLING)
}

/// Build the medicine-path request for a medicine name.
pub fn build_medicine_prompt(name: &MedicineName) -> CompletionRequest {
    CompletionRequest::new(
        MEDICINE_SYSTEM_PROMPT,
        format!("Provide information about the medicine: {name}"),
        MEDICINE_SAMPLING,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MEDICINE_FIELDS;

    #[test]
    fn test_chat_prompt_has_system_then_user() {
        let question = NonEmptyText::new("What is fever?").unwrap();
        let request = build_chat_prompt(&question);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0], ChatMessage::system(CHAT_SYSTEM_PROMPT));
        assert_eq!(request.messages[1], ChatMessage::user("What is fever?"));
        assert_eq!(request.sampling, CHAT_SAMPLING);
    }

    #[test]
    fn test_medicine_prompt_embeds_name() {
        let name = MedicineName::new("Metformin").unwrap();
        let request = build_medicine_prompt(&name);

        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(
            request.messages[1].content,
            "Provide information about the medicine: Metformin"
        );
        assert_eq!(request.sampling.max_tokens, 500);
        assert!((request.sampling.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_medicine_system_prompt_lists_every_field() {
        for field in MEDICINE_FIELDS {
            assert!(
                MEDICINE_SYSTEM_PROMPT.contains(&format!("{field}:''")),
                "schema is missing {field}"
            );
        }
        assert!(MEDICINE_SYSTEM_PROMPT.contains("WITHOUT dosing"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let message = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(message, serde_json::json!({"role": "user", "content": "hi"}));
    }
}
