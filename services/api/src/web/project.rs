//! services/api/src/web/project.rs
//!
//! Axum handlers for the single-document project state and the export
//! pipeline: title/outline/chapter/chat mutations (each schedules the
//! debounced auto-save), derived queries (progress, preview, validation,
//! slot size) and the three downloadable export artifacts.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use skripsi_core::domain::{BabContent, ChatMessage, OutlineItem, Project, Sender};
use skripsi_core::export;
use skripsi_core::outline::normalize_reply;
use tracing::error;
use uuid::Uuid;

use crate::web::rest::{assistant_error_status, AiFailure};
use crate::web::state::AppState;

type HandlerError = (StatusCode, Json<AiFailure>);

fn reject(status: StatusCode, message: String) -> HandlerError {
    (status, Json(AiFailure { error: message }))
}

fn assistant_failure(error: skripsi_core::ports::AssistantError) -> HandlerError {
    reject(assistant_error_status(&error), error.to_string())
}

//=========================================================================================
// Payload Structs
//=========================================================================================

#[derive(Deserialize)]
pub struct TitlePayload {
    pub title: String,
}

#[derive(Deserialize)]
pub struct MovePayload {
    pub from: usize,
    pub to: usize,
}

#[derive(Deserialize)]
pub struct ChatPayload {
    pub message: String,
}

#[derive(Deserialize)]
pub struct GenerateBabPayload {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

//=========================================================================================
// Project State Handlers
//=========================================================================================

/// Returns the current project snapshot.
pub async fn get_project(State(app_state): State<Arc<AppState>>) -> Json<Project> {
    Json(app_state.project.read().await.clone())
}

/// Sets the project title. Rejected locally (minimum 5 characters) before
/// anything else happens.
pub async fn put_title(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<TitlePayload>,
) -> Result<Json<Project>, HandlerError> {
    app_state
        .try_mutate(|project| project.set_title(&payload.title))
        .await
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(Json(app_state.project.read().await.clone()))
}

/// Replaces the outline wholesale; `order` fields are recomputed.
pub async fn put_outline(
    State(app_state): State<Arc<AppState>>,
    Json(outline): Json<Vec<OutlineItem>>,
) -> Json<Project> {
    app_state.mutate(|project| project.set_outline(outline)).await;
    Json(app_state.project.read().await.clone())
}

/// Moves one outline item to a new position, renumbering every item.
pub async fn move_outline_item(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<MovePayload>,
) -> Result<Json<Project>, HandlerError> {
    app_state
        .try_mutate(|project| project.move_outline_item(payload.from, payload.to))
        .await
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(Json(app_state.project.read().await.clone()))
}

/// Removes one outline item by id.
pub async fn delete_outline_item(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<Project> {
    app_state
        .mutate(|project| project.remove_outline_item(&id))
        .await;
    Json(app_state.project.read().await.clone())
}

/// Upserts one chapter content (replace-by-id, never duplicate).
pub async fn put_bab_content(
    State(app_state): State<Arc<AppState>>,
    Json(content): Json<BabContent>,
) -> Json<Project> {
    app_state
        .mutate(|project| project.upsert_bab_content(content))
        .await;
    Json(app_state.project.read().await.clone())
}

/// Replaces the chat transcript wholesale.
pub async fn put_chat_history(
    State(app_state): State<Arc<AppState>>,
    Json(history): Json<Vec<ChatMessage>>,
) -> Json<Project> {
    app_state
        .mutate(|project| project.set_chat_history(history))
        .await;
    Json(app_state.project.read().await.clone())
}

/// Clears the chat transcript.
pub async fn delete_chat_history(State(app_state): State<Arc<AppState>>) -> Json<Project> {
    app_state.mutate(|project| project.clear_chat()).await;
    Json(app_state.project.read().await.clone())
}

/// Resets the project and removes the durable slot. A failure to remove the
/// slot is logged and absorbed; the in-memory reset stands.
pub async fn delete_project(State(app_state): State<Arc<AppState>>) -> Json<Project> {
    app_state.mutate(|project| project.reset()).await;
    if let Err(e) = app_state.store.clear().await {
        error!("Failed to clear the project slot: {e}");
    }
    Json(app_state.project.read().await.clone())
}

//=========================================================================================
// Assistant-backed Mutations
//=========================================================================================

/// Generates an outline for the current title and merges it into the
/// project. The minimum-title check runs before any upstream call; a
/// malformed model response silently falls back to the default skeleton.
pub async fn generate_outline(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Project>, HandlerError> {
    let title = {
        let project = app_state.project.read().await;
        if project.title.trim().chars().count() < skripsi_core::domain::MIN_TITLE_LEN {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                "Judul skripsi minimal 5 karakter".to_string(),
            ));
        }
        project.title.clone()
    };

    let ai = app_state.ai().map_err(assistant_failure)?;
    let reply = ai
        .outline
        .generate_outline(&title)
        .await
        .map_err(assistant_failure)?;
    let outline = normalize_reply(reply);

    app_state.mutate(|project| project.set_outline(outline)).await;
    Ok(Json(app_state.project.read().await.clone()))
}

/// Generates chapter prose for one outline item and upserts it as
/// AI-generated content.
pub async fn generate_bab_content(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<GenerateBabPayload>,
) -> Result<Json<Project>, HandlerError> {
    let (title, outline, bab_title) = {
        let project = app_state.project.read().await;
        let item = project
            .outline
            .iter()
            .find(|item| item.id == payload.id)
            .ok_or_else(|| {
                reject(
                    StatusCode::NOT_FOUND,
                    format!("Bab dengan id '{}' tidak ditemukan di outline", payload.id),
                )
            })?;
        (project.title.clone(), project.outline.clone(), item.title.clone())
    };

    let ai = app_state.ai().map_err(assistant_failure)?;
    let content = ai
        .bab
        .generate_bab_content(&title, &outline, &bab_title)
        .await
        .map_err(assistant_failure)?;

    app_state
        .mutate(|project| {
            project.upsert_bab_content(BabContent {
                id: payload.id.clone(),
                title: bab_title.clone(),
                content,
                ai_generated: true,
                last_modified: Utc::now(),
            })
        })
        .await;
    Ok(Json(app_state.project.read().await.clone()))
}

/// Sends one message to the assistant and appends both sides of the
/// exchange to the transcript.
pub async fn post_chat_message(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<ChatReply>, HandlerError> {
    let ai = app_state.ai().map_err(assistant_failure)?;
    let reply = ai.chat.chat(&payload.message).await.map_err(assistant_failure)?;

    app_state
        .mutate(|project| {
            project.push_chat_message(ChatMessage {
                id: Uuid::new_v4().to_string(),
                message: payload.message.clone(),
                sender: Sender::User,
                timestamp: Utc::now(),
            });
            project.push_chat_message(ChatMessage {
                id: Uuid::new_v4().to_string(),
                message: reply.clone(),
                sender: Sender::Assistant,
                timestamp: Utc::now(),
            });
        })
        .await;

    Ok(Json(ChatReply { reply }))
}

//=========================================================================================
// Derived Queries
//=========================================================================================

pub async fn get_progress(State(app_state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let project = app_state.project.read().await;
    Json(json!({ "progress": project.progress() }))
}

pub async fn get_preview(State(app_state): State<Arc<AppState>>) -> String {
    let project = app_state.project.read().await;
    export::preview(&project)
}

pub async fn get_validation(
    State(app_state): State<Arc<AppState>>,
) -> Json<export::ValidationReport> {
    let project = app_state.project.read().await;
    Json(export::validate(&project))
}

/// Serialized byte length of the durable slot, for diagnostics.
pub async fn get_storage_size(
    State(app_state): State<Arc<AppState>>,
) -> Json<serde_json::Value> {
    let size = app_state.store.size().await.unwrap_or_else(|e| {
        error!("Failed to read the slot size: {e}");
        0
    });
    Json(json!({ "size": size }))
}

//=========================================================================================
// Export Handlers
//=========================================================================================

fn attachment_headers(content_type: &'static str, file_name: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers
}

fn export_failure(e: export::ExportError) -> HandlerError {
    error!("Export failed: {e:?}");
    reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// Word-processor export; the artifact is `{slug}_skripsi.docx`.
pub async fn export_docx(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HandlerError> {
    let project = app_state.project.read().await.clone();
    let bytes = export::to_docx(&project).map_err(export_failure)?;
    let headers = attachment_headers(
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        &export::docx_file_name(&project),
    );
    Ok((headers, bytes))
}

/// Markdown export; the artifact is `{slug}_skripsi.md`.
pub async fn export_markdown(
    State(app_state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let project = app_state.project.read().await.clone();
    let markdown = export::to_markdown(&project);
    let headers = attachment_headers("text/markdown", &export::markdown_file_name(&project));
    (headers, markdown)
}

/// JSON backup export; the artifact is `{slug}_backup.json`.
pub async fn export_json(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HandlerError> {
    let project = app_state.project.read().await.clone();
    let json = export::to_json(&project).map_err(export_failure)?;
    let headers = attachment_headers("application/json", &export::json_file_name(&project));
    Ok((headers, json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FileProjectStore;
    use crate::config::Config;
    use async_trait::async_trait;
    use skripsi_core::outline::OutlineReply;
    use skripsi_core::ports::{
        AssistantError, AssistantResult, BabGenerationService, ChatAssistantService,
        OutlineGenerationService,
    };
    use crate::web::state::AiAdapters;
    use std::time::Duration;
    use tempfile::TempDir;

    /// A scripted assistant: outline replies with unparseable text, chapter
    /// generation with fixed prose, chat with an echo.
    struct FakeAssistant;

    #[async_trait]
    impl OutlineGenerationService for FakeAssistant {
        async fn generate_outline(&self, _title: &str) -> AssistantResult<OutlineReply> {
            Ok(OutlineReply::Raw("bukan JSON sama sekali".to_string()))
        }
    }

    #[async_trait]
    impl BabGenerationService for FakeAssistant {
        async fn generate_bab_content(
            &self,
            _title: &str,
            _outline: &[OutlineItem],
            bab_title: &str,
        ) -> AssistantResult<String> {
            Ok(format!("Konten lengkap untuk {bab_title}."))
        }
    }

    #[async_trait]
    impl ChatAssistantService for FakeAssistant {
        async fn chat(&self, message: &str) -> AssistantResult<String> {
            Ok(format!("Jawaban untuk: {message}"))
        }
    }

    /// An assistant that always fails with the given classified error.
    struct FailingAssistant(AssistantError);

    #[async_trait]
    impl OutlineGenerationService for FailingAssistant {
        async fn generate_outline(&self, _title: &str) -> AssistantResult<OutlineReply> {
            Err(self.0.clone())
        }
    }

    fn test_config(dir: &TempDir) -> Config {
        Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            log_level: tracing::Level::INFO,
            openai_api_key: Some("sk-test".to_string()),
            ai_model: "gpt-3.5-turbo".to_string(),
            data_dir: dir.path().to_path_buf(),
            autosave_delay_ms: 10,
        }
    }

    fn test_state(dir: &TempDir, ai: Option<AiAdapters>) -> Arc<AppState> {
        let config = Arc::new(test_config(dir));
        let store = Arc::new(FileProjectStore::new(
            dir.path(),
            Duration::from_millis(config.autosave_delay_ms),
        ));
        Arc::new(AppState {
            project: tokio::sync::RwLock::new(Project::new()),
            store,
            ai,
            config,
        })
    }

    fn fake_adapters() -> AiAdapters {
        AiAdapters {
            outline: Arc::new(FakeAssistant),
            bab: Arc::new(FakeAssistant),
            chat: Arc::new(FakeAssistant),
        }
    }

    #[tokio::test]
    async fn short_title_is_rejected_before_any_generation() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, Some(fake_adapters()));

        let err = put_title(State(state.clone()), Json(TitlePayload { title: "T".into() }))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(err.1.error, "Judul skripsi minimal 5 karakter");

        // Outline generation also refuses while the title is too short,
        // without touching the (fake) upstream.
        let err = generate_outline(State(state)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_outline_reply_yields_the_default_skeleton() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, Some(fake_adapters()));

        put_title(
            State(state.clone()),
            Json(TitlePayload {
                title: "Implementasi Machine Learning untuk Prediksi Harga Saham".into(),
            }),
        )
        .await
        .unwrap();

        let project = generate_outline(State(state)).await.unwrap();
        assert_eq!(project.outline.len(), 5);
        let orders: Vec<u32> = project.outline.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn generated_bab_content_is_upserted_as_ai_generated() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, Some(fake_adapters()));

        put_title(
            State(state.clone()),
            Json(TitlePayload { title: "Judul Skripsi Saya".into() }),
        )
        .await
        .unwrap();
        generate_outline(State(state.clone())).await.unwrap();

        let project = generate_bab_content(
            State(state.clone()),
            Json(GenerateBabPayload { id: "bab-1".into() }),
        )
        .await
        .unwrap();

        let bab = project.bab_contents.iter().find(|c| c.id == "bab-1").unwrap();
        assert!(bab.ai_generated);
        assert!(bab.content.contains("BAB 1: PENDAHULUAN"));
    }

    #[tokio::test]
    async fn generating_for_an_unknown_chapter_is_not_found() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, Some(fake_adapters()));

        let err = generate_bab_content(
            State(state),
            Json(GenerateBabPayload { id: "bab-9".into() }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn chat_appends_both_sides_of_the_exchange() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, Some(fake_adapters()));

        let reply = post_chat_message(
            State(state.clone()),
            Json(ChatPayload { message: "Bagaimana menulis BAB 3?".into() }),
        )
        .await
        .unwrap();
        assert_eq!(reply.reply, "Jawaban untuk: Bagaimana menulis BAB 3?");

        let project = state.project.read().await;
        assert_eq!(project.chat_history.len(), 2);
        assert_eq!(project.chat_history[0].sender, Sender::User);
        assert_eq!(project.chat_history[1].sender, Sender::Assistant);
    }

    #[tokio::test]
    async fn missing_credential_reported_without_upstream_call() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, None);

        let err = post_chat_message(
            State(state),
            Json(ChatPayload { message: "Halo".into() }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.1.error.contains("API Key tidak ditemukan"));
    }

    #[tokio::test]
    async fn rate_limited_outline_generation_surfaces_the_fixed_message() {
        let dir = TempDir::new().unwrap();
        let ai = AiAdapters {
            outline: Arc::new(FailingAssistant(AssistantError::RateLimited)),
            bab: Arc::new(FakeAssistant),
            chat: Arc::new(FakeAssistant),
        };
        let state = test_state(&dir, Some(ai));
        put_title(
            State(state.clone()),
            Json(TitlePayload { title: "Judul Skripsi Saya".into() }),
        )
        .await
        .unwrap();

        let err = generate_outline(State(state)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.1.error, "Rate limit exceeded. Silakan tunggu beberapa saat.");
    }

    #[tokio::test]
    async fn reset_clears_memory_and_slot() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, Some(fake_adapters()));

        put_title(
            State(state.clone()),
            Json(TitlePayload { title: "Judul Skripsi Saya".into() }),
        )
        .await
        .unwrap();
        state.store.save(&state.project.read().await.clone()).await.unwrap();

        let project = delete_project(State(state.clone())).await;
        assert!(project.title.is_empty());
        assert!(state.store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejected_mutations_do_not_schedule_a_save() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, Some(fake_adapters()));

        put_title(State(state.clone()), Json(TitlePayload { title: "T".into() }))
            .await
            .unwrap_err();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(state.store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mutations_are_mirrored_to_the_slot_after_the_debounce_window() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, Some(fake_adapters()));

        put_title(
            State(state.clone()),
            Json(TitlePayload { title: "Judul Skripsi Saya".into() }),
        )
        .await
        .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        let stored = state.store.load().await.unwrap().unwrap();
        assert_eq!(stored.title, "Judul Skripsi Saya");
    }
}
