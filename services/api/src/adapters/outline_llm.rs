//! services/api/src/adapters/outline_llm.rs
//!
//! This module contains the adapter for outline generation. It implements
//! the `OutlineGenerationService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"Kamu adalah asisten AI yang membantu mahasiswa menulis skripsi.
Tugasmu adalah membuat outline skripsi yang terstruktur dan lengkap berdasarkan judul yang diberikan.

Buatlah outline skripsi dengan 5 BAB yang standar:
- BAB 1: PENDAHULUAN (berisi latar belakang, rumusan masalah, tujuan penelitian, manfaat penelitian)
- BAB 2: TINJAUAN PUSTAKA (berisi landasan teori, penelitian terdahulu, kerangka konseptual)
- BAB 3: METODE PENELITIAN (berisi jenis penelitian, populasi dan sampel, teknik pengumpulan data, analisis data)
- BAB 4: HASIL DAN PEMBAHASAN (berisi hasil penelitian, analisis data, pembahasan)
- BAB 5: PENUTUP (berisi kesimpulan, saran, keterbatasan penelitian)

Untuk setiap BAB, buatlah sub-bab yang sesuai dengan judul skripsi.
Format response dalam JSON dengan struktur:
[
  {
    "title": "BAB 1: PENDAHULUAN",
    "content": "Deskripsi singkat isi bab dan sub-bab yang akan dibahas",
    "subbab": ["1.1 Latar Belakang", "1.2 Rumusan Masalah", "dst..."]
  }
]"#;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    error::OpenAIError, Client,
};
use async_trait::async_trait;
use skripsi_core::outline::{OutlineReply, RawOutlineItem};
use skripsi_core::ports::{AssistantError, AssistantResult, OutlineGenerationService};

use crate::adapters::map_openai_error;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `OutlineGenerationService` using an
/// OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiOutlineAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiOutlineAdapter {
    /// Creates a new `OpenAiOutlineAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `OutlineGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl OutlineGenerationService for OpenAiOutlineAdapter {
    /// Requests a five-BAB outline for the given title. The model text is
    /// parsed as a JSON array of raw items; when parsing fails the raw text
    /// is returned unparsed so the caller-side normalization can fall back
    /// to the default skeleton.
    async fn generate_outline(&self, title: &str) -> AssistantResult<OutlineReply> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| AssistantError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(format!("Buatlah outline skripsi untuk judul: \"{title}\""))
                .build()
                .map_err(|e| AssistantError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(1000u32)
            .temperature(0.7)
            .build()
            .map_err(|e| AssistantError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| map_openai_error(e))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        // Parse failure is not an error here: hand the raw text back and
        // let normalization decide.
        match serde_json::from_str::<Vec<RawOutlineItem>>(&text) {
            Ok(items) => Ok(OutlineReply::Parsed(items)),
            Err(_) => Ok(OutlineReply::Raw(text)),
        }
    }
}
