pub mod domain;
pub mod export;
pub mod outline;
pub mod ports;

pub use domain::{BabContent, ChatMessage, DomainError, OutlineItem, Project, Sender};
pub use outline::{normalize_outline, normalize_reply, OutlineReply, RawOutlineItem};
pub use ports::{
    AssistantError, AssistantResult, BabGenerationService, ChatAssistantService,
    OutlineGenerationService, ProjectStore, StoreError, StoreResult,
};
