//! Request handlers for the REST API.

use crate::error::ApiError;
use crate::AppState;
use api_shared::{ChatReq, ChatRes, ErrorRes, HealthRes, HealthService, MedicineAnalyzeRes};
use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    response::{Html, Json},
};
use utoipa::ToSchema;

/// Name of the multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Multipart form accepted by `POST /medicine-analyze` (documentation only).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct MedicineUpload {
    /// Any file; only short UTF-8 text is understood as a medicine name.
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns liveness and whether the inference API key was configured at startup.
///
/// # Returns
/// * `Json<HealthRes>` - Health status response
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(
        state.service.is_inference_configured(),
    ))
}

#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatReq,
    responses(
        (status = 200, description = "Model answer", body = ChatRes),
        (status = 400, description = "Empty question or malformed body", body = ErrorRes),
        (status = 429, description = "Upstream rate limit", body = ErrorRes),
        (status = 502, description = "Upstream failure", body = ErrorRes),
        (status = 503, description = "Inference not configured", body = ErrorRes),
        (status = 504, description = "Upstream timeout", body = ErrorRes)
    )
)]
/// Answer a healthcare question
///
/// Sends the question with the healthcare-assistant system prompt and relays the model's
/// answer unchanged.
///
/// # Returns
/// * `Ok(Json<ChatRes>)` - The model answer
/// * `Err(ApiError)` - See the error contract in `crate::error`
///
/// # Errors
/// Returns `400 Bad Request` if the body is not valid JSON or the question is blank, and a
/// 5xx/429 status if the upstream call fails.
#[axum::debug_handler]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatReq>, JsonRejection>,
) -> Result<Json<ChatRes>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::new(e.status(), e.body_text()))?;

    let answer = state.service.answer_question(&req.question).await?;
    Ok(Json(ChatRes { answer }))
}

#[utoipa::path(
    post,
    path = "/medicine-analyze",
    request_body(content = MedicineUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Normalized medicine record or raw model text", body = MedicineAnalyzeRes),
        (status = 400, description = "Missing file field or malformed multipart body", body = ErrorRes),
        (status = 413, description = "Upload exceeds the body limit", body = ErrorRes),
        (status = 422, description = "Upload is not a short UTF-8 medicine name", body = ErrorRes),
        (status = 502, description = "Upstream failure", body = ErrorRes),
        (status = 503, description = "Inference not configured", body = ErrorRes),
        (status = 504, description = "Upstream timeout", body = ErrorRes)
    )
)]
/// Analyse an uploaded medicine name
///
/// Reads the `file` field, asks the model for general (non-dosing) information and normalizes
/// the reply. A reply that contains no usable JSON is still a `200` with `parsed: false`.
///
/// # Returns
/// * `Ok(Json<MedicineAnalyzeRes>)` - `{parsed: true, data}` or `{parsed: false, raw}`
/// * `Err(ApiError)` - See the error contract in `crate::error`
#[axum::debug_handler]
pub async fn medicine_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MedicineAnalyzeRes>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::new(e.status(), e.body_text()))?;
    let bytes = read_upload(&mut multipart).await?;

    let response = state.service.analyze_upload(&bytes).await?;
    Ok(Json(response.into()))
}

async fn read_upload(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            return field
                .bytes()
                .await
                .map_err(|e| ApiError::new(e.status(), e.body_text()));
        }
    }

    Err(ApiError::bad_request(format!(
        "multipart body is missing the `{UPLOAD_FIELD}` field"
    )))
}

/// Serve the frontend entry page
///
/// # Errors
/// Returns `404 Not Found` if `index.html` is missing from the static directory.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Ok(Html(html)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::not_found("Frontend not found."))
        }
        Err(e) => {
            tracing::error!("failed to read {}: {}", path.display(), e);
            Err(ApiError::new(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Frontend could not be read.",
            ))
        }
    }
}
