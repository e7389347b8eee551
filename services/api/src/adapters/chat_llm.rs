//! services/api/src/adapters/chat_llm.rs
//!
//! This module contains the adapter for the conversational assistant. It
//! implements the `ChatAssistantService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"Kamu adalah asisten AI yang membantu mahasiswa dalam penulisan skripsi.
Kamu bisa membantu dengan:
- Memberikan saran perbaikan konten
- Menjawab pertanyaan tentang metodologi penelitian
- Membantu mencari referensi dan sumber
- Memberikan feedback tentang struktur dan alur penulisan
- Membantu mengatasi writer's block

Selalu berikan jawaban yang konstruktif, akademis, dan membantu.
Gunakan bahasa Indonesia yang baik dan formal namun tetap ramah."#;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    error::OpenAIError, Client,
};
use async_trait::async_trait;
use skripsi_core::ports::{AssistantError, AssistantResult, ChatAssistantService};

use crate::adapters::map_openai_error;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ChatAssistantService` using an
/// OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiChatAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatAdapter {
    /// Creates a new `OpenAiChatAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `ChatAssistantService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ChatAssistantService for OpenAiChatAdapter {
    /// Sends the user's message as-is to the thesis-assistant persona and
    /// returns the raw reply text.
    async fn chat(&self, message: &str) -> AssistantResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| AssistantError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(message)
                .build()
                .map_err(|e| AssistantError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(2000u32)
            .temperature(0.7)
            .build()
            .map_err(|e| AssistantError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| map_openai_error(e))?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
