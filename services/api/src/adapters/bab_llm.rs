//! services/api/src/adapters/bab_llm.rs
//!
//! This module contains the adapter for chapter-content generation. It
//! implements the `BabGenerationService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"Kamu adalah asisten AI yang membantu mahasiswa menulis konten skripsi.
Tugasmu adalah membuat konten lengkap untuk bab yang diminta berdasarkan outline yang sudah ada.

Buatlah konten yang:
- Akademis dan formal
- Relevan dengan judul skripsi
- Terstruktur dengan baik
- Menggunakan bahasa Indonesia yang baik dan benar
- Panjang minimal 500 kata
- Sesuai dengan standar penulisan skripsi

Sertakan referensi contoh (bisa fiktif untuk template) jika diperlukan."#;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    error::OpenAIError, Client,
};
use async_trait::async_trait;
use skripsi_core::domain::OutlineItem;
use skripsi_core::ports::{AssistantError, AssistantResult, BabGenerationService};

use crate::adapters::map_openai_error;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `BabGenerationService` using an
/// OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiBabAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiBabAdapter {
    /// Creates a new `OpenAiBabAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    /// Embeds the full outline as context, one `title: description` line
    /// per chapter.
    fn build_user_prompt(title: &str, outline: &[OutlineItem], bab_title: &str) -> String {
        let outline_lines = outline
            .iter()
            .map(|item| format!("{}: {}", item.title, item.content))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Judul Skripsi: \"{title}\"\n\n\
             Outline keseluruhan:\n{outline_lines}\n\n\
             Buatlah konten lengkap untuk: {bab_title}\n\n\
             Konten harus detailed dan siap pakai untuk skripsi."
        )
    }
}

//=========================================================================================
// `BabGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl BabGenerationService for OpenAiBabAdapter {
    /// Generates long-form prose for one chapter. Returns the raw text
    /// content, no further parsing.
    async fn generate_bab_content(
        &self,
        title: &str,
        outline: &[OutlineItem],
        bab_title: &str,
    ) -> AssistantResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| AssistantError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(Self::build_user_prompt(title, outline, bab_title))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_embeds_the_whole_outline() {
        let outline = vec![
            OutlineItem {
                id: "bab-1".into(),
                title: "BAB 1: PENDAHULUAN".into(),
                content: "Latar belakang".into(),
                order: 1,
            },
            OutlineItem {
                id: "bab-2".into(),
                title: "BAB 2: TINJAUAN PUSTAKA".into(),
                content: "Landasan teori".into(),
                order: 2,
            },
        ];

        let prompt = OpenAiBabAdapter::build_user_prompt(
            "Judul Skripsi Saya",
            &outline,
            "BAB 2: TINJAUAN PUSTAKA",
        );

        assert!(prompt.contains("Judul Skripsi: \"Judul Skripsi Saya\""));
        assert!(prompt.contains("BAB 1: PENDAHULUAN: Latar belakang"));
        assert!(prompt.contains("BAB 2: TINJAUAN PUSTAKA: Landasan teori"));
        assert!(prompt.contains("Buatlah konten lengkap untuk: BAB 2: TINJAUAN PUSTAKA"));
    }
}
