//! services/api/src/adapters/mod.rs
//!
//! Concrete implementations of the `skripsi_core` ports: the three
//! OpenAI-backed assistant adapters and the file-backed project store.

pub mod bab_llm;
pub mod chat_llm;
pub mod outline_llm;
pub mod storage;

pub use bab_llm::OpenAiBabAdapter;
pub use chat_llm::OpenAiChatAdapter;
pub use outline_llm::OpenAiOutlineAdapter;
pub use storage::FileProjectStore;

use async_openai::error::OpenAIError;
use skripsi_core::ports::AssistantError;

/// Maps an upstream client error to the classified taxonomy. Structured
/// information from the transport is used first (error type for quota and
/// rate limits, the transport variant for network failures); the legacy
/// substring classification of the message text remains as the fallback,
/// since upstream wording is not a stable contract.
pub(crate) fn map_openai_error(err: OpenAIError) -> AssistantError {
    match err {
        OpenAIError::Reqwest(_) => AssistantError::Network,
        OpenAIError::ApiError(api) => {
            match api.r#type.as_deref() {
                Some("insufficient_quota") => return AssistantError::QuotaExhausted,
                // OpenAI reports rate limits with these error types.
                Some("tokens") | Some("requests") => return AssistantError::RateLimited,
                _ => {}
            }
            AssistantError::classify(&api.message)
        }
        other => AssistantError::classify(&other.to_string()),
    }
}
