//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{FileProjectStore, OpenAiBabAdapter, OpenAiChatAdapter, OpenAiOutlineAdapter},
    config::Config,
    error::ApiError,
    web::{
        ai_handler, ai_health_handler,
        project::{
            delete_chat_history, delete_outline_item, delete_project, export_docx, export_json,
            export_markdown, generate_bab_content, generate_outline, get_preview, get_progress,
            get_project, get_storage_size, get_validation, move_outline_item, post_chat_message,
            put_bab_content, put_chat_history, put_outline, put_title,
        },
        rest::ApiDoc,
        state::{AiAdapters, AppState},
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use skripsi_core::domain::Project;
use skripsi_core::ports::ProjectStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize the Project Store & Restore the Last Session ---
    let store: Arc<FileProjectStore> = Arc::new(FileProjectStore::new(
        &config.data_dir,
        Duration::from_millis(config.autosave_delay_ms),
    ));
    let project = match store.load().await {
        Ok(Some(project)) => {
            info!("Restored project '{}' from the durable slot.", project.title);
            project
        }
        Ok(None) => Project::new(),
        Err(e) => {
            warn!("Could not read the project slot, starting fresh: {e}");
            Project::new()
        }
    };

    // --- 3. Initialize the Assistant Adapters (only with a credential) ---
    let ai = match config.openai_api_key.as_ref() {
        Some(api_key) => {
            let openai_config = OpenAIConfig::new().with_api_key(api_key);
            let openai_client = Client::with_config(openai_config);
            Some(AiAdapters {
                outline: Arc::new(OpenAiOutlineAdapter::new(
                    openai_client.clone(),
                    config.ai_model.clone(),
                )),
                bab: Arc::new(OpenAiBabAdapter::new(
                    openai_client.clone(),
                    config.ai_model.clone(),
                )),
                chat: Arc::new(OpenAiChatAdapter::new(
                    openai_client,
                    config.ai_model.clone(),
                )),
            })
        }
        None => {
            // Not fatal: the health probe reports it and every AI call
            // returns the missing-credential message.
            warn!("OPENAI_API_KEY is not set; assistant operations are disabled.");
            None
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        project: RwLock::new(project),
        store,
        ai,
        config: config.clone(),
    });

    // --- 5. Create the Web Router ---
    let api_router = Router::new()
        .route("/api/ai", post(ai_handler).get(ai_health_handler))
        .route(
            "/project",
            get(get_project).delete(delete_project),
        )
        .route("/project/title", put(put_title))
        .route("/project/outline", put(put_outline))
        .route("/project/outline/move", post(move_outline_item))
        .route("/project/outline/generate", post(generate_outline))
        .route("/project/outline/{id}", delete(delete_outline_item))
        .route("/project/bab", put(put_bab_content))
        .route("/project/bab/generate", post(generate_bab_content))
        .route(
            "/project/chat",
            put(put_chat_history).delete(delete_chat_history),
        )
        .route("/project/chat/message", post(post_chat_message))
        .route("/project/progress", get(get_progress))
        .route("/project/preview", get(get_preview))
        .route("/project/validate", get(get_validation))
        .route("/project/storage", get(get_storage_size))
        .route("/export/docx", get(export_docx))
        .route("/export/markdown", get(export_markdown))
        .route("/export/json", get(export_json))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
