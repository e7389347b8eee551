//! crates/skripsi_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the concrete completion service and storage
//! backend behind them.

use async_trait::async_trait;

use crate::domain::{OutlineItem, Project};
use crate::outline::OutlineReply;

//=========================================================================================
// Assistant Gateway Errors
//=========================================================================================

/// The classified error taxonomy for every assistant operation. Each kind
/// carries a fixed Indonesian user-facing message; upstream details are
/// logged, never shown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistantError {
    /// No service credential configured at all. Reported before any
    /// upstream call is attempted.
    #[error("API Key tidak ditemukan. Pastikan OPENAI_API_KEY sudah diset di environment variables.")]
    MissingCredential,
    /// The upstream rejected the configured key.
    #[error("API Key tidak valid atau sudah expired")]
    InvalidCredential,
    /// The upstream throttled the request.
    #[error("Rate limit exceeded. Silakan tunggu beberapa saat.")]
    RateLimited,
    /// The upstream billing quota is exhausted.
    #[error("Quota API sudah habis. Silakan upgrade plan OpenAI Anda.")]
    QuotaExhausted,
    /// Transport failure talking to the upstream.
    #[error("Koneksi internet bermasalah. Silakan periksa koneksi Anda.")]
    Network,
    /// Anything else. The payload is the upstream detail for the logs.
    #[error("Terjadi kesalahan saat berkomunikasi dengan AI. Silakan coba lagi.")]
    Unexpected(String),
}

impl AssistantError {
    /// Classifies an upstream error from its message text alone. This is the
    /// legacy substring fallback; adapters should prefer structured error
    /// codes from the transport where available and only fall back to this.
    pub fn classify(message: &str) -> Self {
        if message.contains("API key") {
            Self::InvalidCredential
        } else if message.contains("rate limit") {
            Self::RateLimited
        } else if message.contains("insufficient_quota") || message.contains("quota") {
            Self::QuotaExhausted
        } else if message.contains("network") {
            Self::Network
        } else {
            Self::Unexpected(message.to_string())
        }
    }
}

/// A convenience type alias for assistant operations.
pub type AssistantResult<T> = Result<T, AssistantError>;

//=========================================================================================
// Assistant Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait OutlineGenerationService: Send + Sync {
    /// Asks the completion service for a chapter outline for `title`.
    ///
    /// A model response that fails to parse as JSON is NOT an error: it is
    /// returned as [`OutlineReply::Raw`] and normalization downstream falls
    /// back to the default skeleton.
    async fn generate_outline(&self, title: &str) -> AssistantResult<OutlineReply>;
}

#[async_trait]
pub trait BabGenerationService: Send + Sync {
    /// Generates long-form chapter prose for `bab_title`, with the full
    /// outline supplied as context. Returns raw text, no further parsing.
    async fn generate_bab_content(
        &self,
        title: &str,
        outline: &[OutlineItem],
        bab_title: &str,
    ) -> AssistantResult<String>;
}

#[async_trait]
pub trait ChatAssistantService: Send + Sync {
    /// Sends one user message to the thesis-assistant persona and returns
    /// the reply text.
    async fn chat(&self, message: &str) -> AssistantResult<String>;
}

//=========================================================================================
// Project Store Port
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serde(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The durable slot holding the serialized project. The store is a pure
/// mirror of the in-memory aggregate at save time; it never holds an
/// independent copy.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Serializes the full project into the slot, replacing any previous
    /// contents. Timestamps are written in their canonical ISO-8601 form.
    async fn save(&self, project: &Project) -> StoreResult<()>;

    /// Reads the slot back. Returns `Ok(None)` when the slot is absent or
    /// its contents fail to deserialize (the failure is logged by the
    /// implementation, never surfaced).
    async fn load(&self) -> StoreResult<Option<Project>>;

    /// Removes the slot entirely.
    async fn clear(&self) -> StoreResult<()>;

    /// Byte length of the current slot, for diagnostics. Zero when absent.
    async fn size(&self) -> StoreResult<u64>;

    /// Schedules a debounced save: rapid successive calls are coalesced and
    /// only the last project value within the delay window is committed.
    /// Failures of the eventual write are logged and absorbed.
    fn schedule_save(&self, project: Project);
}
