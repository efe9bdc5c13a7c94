//! # Hospital AI Core
//!
//! Core logic for the Hospital AI assistant:
//! - Prompt construction for healthcare questions and medicine lookups
//! - The chat-completion client seam ([`ChatCompletion`]) and its Groq implementation
//! - Normalization of free-text model replies into medicine records
//! - Validation of uploaded medicine-name files
//!
//! **No API concerns**: HTTP routing, CORS, static files and OpenAPI belong in `api-rest` and
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod inference;
pub mod normalizer;
pub mod prompt;
pub mod record;
pub mod upload;

pub use config::{CoreConfig, InferenceConfig};
pub use constants::MEDICINE_FIELDS;
pub use error::{CoreError, CoreResult, InferenceError, InferenceResult, UploadError};
pub use hai_types::{MedicineName, NonEmptyText};
pub use inference::{ChatCompletion, GroqClient};
pub use normalizer::{normalize, normalize_with, ExtractionStrategy, NormalizedResponse};
pub use record::MedicineRecord;

use std::sync::Arc;

/// Request-level operations: answer a question, analyse a medicine.
///
/// Holds no mutable state; clone it freely into request handlers.
#[derive(Clone)]
pub struct AssistantService {
    cfg: Arc<CoreConfig>,
    client: Arc<dyn ChatCompletion>,
}

impl AssistantService {
    /// Creates a new `AssistantService` around an already-constructed client.
    pub fn new(cfg: Arc<CoreConfig>, client: Arc<dyn ChatCompletion>) -> Self {
        Self { cfg, client }
    }

    /// Builds the production service with a [`GroqClient`] from `cfg`.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidConfig` if the HTTP client cannot be built.
    pub fn with_groq(cfg: Arc<CoreConfig>) -> CoreResult<Self> {
        let client = GroqClient::new(cfg.inference().clone())?;
        Ok(Self::new(cfg, Arc::new(client)))
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn is_inference_configured(&self) -> bool {
        self.client.is_configured()
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Answer a free-text healthcare question.
    ///
    /// The model's reply is returned unchanged.
    ///
    /// # Errors
    /// - `CoreError::InvalidInput` if the question is empty or whitespace.
    /// - `CoreError::Inference` if the upstream call fails.
    pub async fn answer_question(&self, question: &str) -> CoreResult<String> {
        let question = NonEmptyText::new(question)
            .map_err(|e| CoreError::InvalidInput(format!("question: {e}")))?;

        let request = prompt::build_chat_prompt(&question);
        Ok(self.client.complete(&request).await?)
    }

    /// Analyse an uploaded file expected to contain a medicine name.
    ///
    /// # Errors
    /// - `CoreError::InvalidUpload` if the upload is unusable and no fallback is configured.
    /// - `CoreError::Inference` if the upstream call fails.
    pub async fn analyze_upload(&self, bytes: &[u8]) -> CoreResult<NormalizedResponse> {
        let name = upload::resolve_medicine_name(bytes, self.cfg.medicine_fallback())?;
        self.analyze_medicine(&name).await
    }

    /// Ask the model about `name` and normalize its reply.
    ///
    /// An unparseable reply is not an error; it comes back as
    /// [`NormalizedResponse::Unparsed`].
    pub async fn analyze_medicine(&self, name: &MedicineName) -> CoreResult<NormalizedResponse> {
        let request = prompt::build_medicine_prompt(name);
        let reply = self.client.complete(&request).await?;

        let normalized = normalize_with(&reply, self.cfg.extraction_strategy());
        if !normalized.is_parsed() {
            tracing::info!("model reply for {} could not be parsed as JSON", name);
        }
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{CompletionRequest, Role, CHAT_SYSTEM_PROMPT, MEDICINE_SYSTEM_PROMPT};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Returns a canned reply and records every request it receives.
    struct CannedCompletion {
        reply: String,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl CannedCompletion {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatCompletion for CannedCompletion {
        async fn complete(&self, request: &CompletionRequest) -> InferenceResult<String> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }

        fn model(&self) -> &str {
            "canned"
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    fn config(fallback: Option<&str>) -> Arc<CoreConfig> {
        let inference = InferenceConfig::new(
            Some("k".into()),
            "http://localhost".into(),
            "canned".into(),
            Duration::from_secs(5),
        )
        .unwrap();
        Arc::new(CoreConfig::new(
            inference,
            ExtractionStrategy::OuterBraces,
            fallback.map(|f| MedicineName::new(f).unwrap()),
        ))
    }

    #[tokio::test]
    async fn test_answer_question_returns_reply_unchanged() {
        let client = CannedCompletion::new("  Fever is a temporary rise in body temperature.\n");
        let service = AssistantService::new(config(None), client.clone());

        let answer = service.answer_question("What is fever?").await.unwrap();
        assert_eq!(answer, "  Fever is a temporary rise in body temperature.\n");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].messages[0].content, CHAT_SYSTEM_PROMPT);
        assert_eq!(seen[0].messages[1].role, Role::User);
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected_before_inference() {
        let client = CannedCompletion::new("unused");
        let service = AssistantService::new(config(None), client.clone());

        let err = service.answer_question("   ").await.expect_err("blank");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("question")));
        assert!(client.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_upload_normalizes_reply() {
        let client = CannedCompletion::new("```json\n{\"name\":\"Cetirizine\",\"form\":\"tablet\"}\n```");
        let service = AssistantService::new(config(None), client.clone());

        let response = service.analyze_upload(b"Cetirizine\n").await.unwrap();
        let data = response.data().expect("parsed");
        assert_eq!(data.get("name"), Some(&json!("Cetirizine")));
        assert_eq!(data.get("schedule"), Some(&json!("")));

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].messages[0].content, MEDICINE_SYSTEM_PROMPT);
        assert_eq!(
            seen[0].messages[1].content,
            "Provide information about the medicine: Cetirizine"
        );
    }

    #[tokio::test]
    async fn test_analyze_upload_rejects_binary_without_fallback() {
        let client = CannedCompletion::new("unused");
        let service = AssistantService::new(config(None), client.clone());

        let err = service.analyze_upload(&[0xff, 0xd8, 0xff]).await.expect_err("binary");
        assert!(matches!(err, CoreError::InvalidUpload(UploadError::NotUtf8)));
        assert!(client.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_upload_uses_configured_fallback() {
        let client = CannedCompletion::new("Sorry, I cannot help with that.");
        let service = AssistantService::new(config(Some("Paracetamol")), client.clone());

        let response = service.analyze_upload(&[0xff, 0xd8, 0xff]).await.unwrap();
        assert_eq!(response.raw(), Some("Sorry, I cannot help with that."));
        assert!(client.seen.lock().unwrap()[0].messages[1]
            .content
            .ends_with("Paracetamol"));
    }
}
