use super::error::ApiError;
use super::page::render_index;
use super::state::{AppState, SharedSession};
use crate::actions::{run_action, run_chat, ActionOutcome};
use crate::pipeline::input::validate_document;
use crate::prompts::UPLOAD_SUCCESS;
use crate::report::{build_report, REPORT_FILE_NAME, REPORT_MIME};
use crate::session::{AnalysisKind, SessionSnapshot};
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Name of the multipart field carrying the résumé.
pub const RESUME_FIELD: &str = "resume";

#[derive(Debug, Deserialize)]
pub struct JobDescriptionBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub question: String,
}

async fn find(state: &AppState, id: &str) -> Result<SharedSession, ApiError> {
    state
        .session(id)
        .await
        .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))
}

/// GET /
pub async fn index() -> Html<String> {
    Html(render_index())
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "talk-to-cv",
        "sessions": state.session_count().await
    }))
}

/// POST /api/sessions
pub async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let id = state.create_session().await;
    info!(session_id = %id, "Session created");
    (StatusCode::CREATED, Json(json!({ "session_id": id })))
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session = find(&state, &id).await?;
    let snapshot = session.lock().await.snapshot();
    Ok(Json(snapshot))
}

/// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.remove_session(&id).await {
        return Err(ApiError::SessionNotFound(id));
    }
    info!(session_id = %id, "Session ended");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/sessions/:id/job-description
pub async fn set_job_description(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<JobDescriptionBody>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session = find(&state, &id).await?;
    let mut guard = session.lock().await;
    guard.job_description = body.text;
    Ok(Json(guard.snapshot()))
}

/// POST /api/sessions/:id/resume - Upload a résumé
pub async fn upload_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let session = find(&state, &id).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::Validation("Invalid file".to_string()))?;

        if let Err(e) = validate_document(Some(&data[..])) {
            warn!(session_id = %id, file_name = %file_name, "Rejected upload: {}", e);
            return Err(ApiError::Validation(e.banner()));
        }

        let bytes = data.len();
        session.lock().await.document = Some(data);
        info!(session_id = %id, file_name = %file_name, bytes, "Résumé uploaded");

        return Ok(Json(json!({
            "message": UPLOAD_SUCCESS,
            "file_name": file_name,
            "bytes": bytes
        })));
    }

    Err(ApiError::Validation("No file uploaded".to_string()))
}

/// POST /api/sessions/:id/actions/:action
pub async fn run_session_action(
    State(state): State<AppState>,
    Path((id, action)): Path<(String, String)>,
) -> Result<Json<ActionOutcome>, ApiError> {
    let kind = action
        .parse::<AnalysisKind>()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let session = find(&state, &id).await?;

    // Work on a copy so readers and JD edits are not blocked by the model call.
    let current = session.lock().await.clone();
    let (next, outcome) = run_action(current, kind, &state.ctx).await;
    if let ActionOutcome::Completed { .. } = outcome {
        session
            .lock()
            .await
            .slots
            .set(kind, next.slots.get(kind));
    }
    Ok(Json(outcome))
}

/// POST /api/sessions/:id/chat
pub async fn chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ActionOutcome>, ApiError> {
    let session = find(&state, &id).await?;

    let current = session.lock().await.clone();
    let (next, outcome) = run_chat(current, &body.question, &state.ctx).await;
    if let ActionOutcome::Completed { .. } = outcome {
        session.lock().await.chat_response = next.chat_response;
    }
    Ok(Json(outcome))
}

/// GET /api/sessions/:id/report
pub async fn download_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session = find(&state, &id).await?;
    let report = build_report(&*session.lock().await);

    let headers = [
        (header::CONTENT_TYPE, format!("{REPORT_MIME}; charset=utf-8")),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{REPORT_FILE_NAME}\""),
        ),
    ];
    Ok((headers, report))
}
