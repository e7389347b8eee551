//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the assistant-gateway endpoints and the
//! master definition for the OpenAPI specification. `POST /api/ai` is the
//! single entry point of the gateway: it dispatches on the operation kind,
//! forwards the structured prompt to the completion service and maps every
//! failure to a classified status code and fixed user-facing message.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use skripsi_core::domain::OutlineItem;
use skripsi_core::outline::OutlineReply;
use skripsi_core::ports::AssistantError;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

use crate::web::state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(ai_handler, ai_health_handler),
    components(schemas(AiRequest, AiSuccess, AiFailure, AiHealth)),
    tags(
        (name = "Asisten Skripsi API", description = "API endpoints for the AI thesis-writing assistant.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

/// The envelope every gateway call uses: an operation kind plus a payload
/// whose fields depend on the kind.
#[derive(Deserialize, ToSchema)]
pub struct AiRequest {
    pub r#type: String,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateOutlineData {
    title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBabData {
    title: String,
    outline: Vec<OutlineItem>,
    bab_title: String,
}

#[derive(Deserialize)]
struct ChatData {
    message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AiSuccess {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AiFailure {
    pub error: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiHealth {
    pub message: String,
    pub has_api_key: bool,
}

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Maps a classified assistant error to its HTTP status. The user-facing
/// message is the error's own Display text; upstream detail stays in the
/// logs.
pub(crate) fn assistant_error_status(error: &AssistantError) -> StatusCode {
    match error {
        AssistantError::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
        AssistantError::InvalidCredential => StatusCode::UNAUTHORIZED,
        AssistantError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        AssistantError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
        AssistantError::Network => StatusCode::INTERNAL_SERVER_ERROR,
        AssistantError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure(error: AssistantError) -> (StatusCode, Json<AiFailure>) {
    if let AssistantError::Unexpected(detail) = &error {
        error!("Assistant gateway failure: {detail}");
    }
    (
        assistant_error_status(&error),
        Json(AiFailure {
            error: error.to_string(),
        }),
    )
}

fn bad_request(message: &str) -> (StatusCode, Json<AiFailure>) {
    (
        StatusCode::BAD_REQUEST,
        Json(AiFailure {
            error: message.to_string(),
        }),
    )
}

fn success(data: serde_json::Value) -> Json<AiSuccess> {
    Json(AiSuccess {
        success: true,
        data,
    })
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// The assistant gateway entry point.
///
/// Dispatches on `type`: `generate_outline`, `generate_bab_content` or
/// `chat`. An unrecognized kind is a 400; classified upstream failures map
/// to 401/429/402/500 with fixed messages. Malformed outline JSON from the
/// model is not a failure: the raw text is returned as `data`.
#[utoipa::path(
    post,
    path = "/api/ai",
    request_body = AiRequest,
    responses(
        (status = 200, description = "Operation succeeded", body = AiSuccess),
        (status = 400, description = "Unrecognized operation kind", body = AiFailure),
        (status = 401, description = "API key invalid or expired", body = AiFailure),
        (status = 402, description = "Quota exhausted", body = AiFailure),
        (status = 429, description = "Rate limited", body = AiFailure),
        (status = 500, description = "Missing credential or generic failure", body = AiFailure)
    )
)]
pub async fn ai_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<AiRequest>,
) -> Result<Json<AiSuccess>, (StatusCode, Json<AiFailure>)> {
    let ai = app_state.ai().map_err(failure)?;

    match request.r#type.as_str() {
        "generate_outline" => {
            let data: GenerateOutlineData = serde_json::from_value(request.data)
                .map_err(|_| bad_request("Field 'title' wajib diisi"))?;
            let reply = ai.outline.generate_outline(&data.title).await.map_err(failure)?;
            let value = match reply {
                OutlineReply::Parsed(items) => serde_json::to_value(items)
                    .map_err(|e| failure(AssistantError::Unexpected(e.to_string())))?,
                OutlineReply::Raw(text) => serde_json::Value::String(text),
            };
            Ok(success(value))
        }
        "generate_bab_content" => {
            let data: GenerateBabData = serde_json::from_value(request.data)
                .map_err(|_| bad_request("Field 'title', 'outline' dan 'babTitle' wajib diisi"))?;
            let content = ai
                .bab
                .generate_bab_content(&data.title, &data.outline, &data.bab_title)
                .await
                .map_err(failure)?;
            Ok(success(serde_json::Value::String(content)))
        }
        "chat" => {
            let data: ChatData = serde_json::from_value(request.data)
                .map_err(|_| bad_request("Field 'message' wajib diisi"))?;
            let reply = ai.chat.chat(&data.message).await.map_err(failure)?;
            Ok(success(serde_json::Value::String(reply)))
        }
        _ => Err(bad_request("Tipe request tidak valid")),
    }
}

/// Health probe: reports whether the service credential is configured,
/// without making a billed upstream request.
#[utoipa::path(
    get,
    path = "/api/ai",
    responses((status = 200, description = "Gateway is running", body = AiHealth))
)]
pub async fn ai_health_handler(State(app_state): State<Arc<AppState>>) -> Json<AiHealth> {
    Json(AiHealth {
        message: "AI API is running".to_string(),
        has_api_key: app_state.ai.is_some(),
    })
}
