use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::models::resume::{ResumeDocument, ResumeRecord, ResumeSummary, DEFAULT_TITLE};
use crate::models::user::CurrentUser;
use crate::state::AppState;
use crate::store::SaveRequest;

#[derive(Debug, Deserialize)]
pub struct UpdateResumeRequest {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub sections: ResumeDocument,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    Ok(Json(state.gateway.list(&user).await?))
}

/// POST /api/v1/resumes
/// Creates a record when `id` is absent (201), overwrites it otherwise (200).
pub async fn handle_save_resume(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(req): ApiJson<SaveRequest>,
) -> Result<(StatusCode, Json<ResumeRecord>), AppError> {
    let status = if req.id.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let record = state.gateway.save(req, &user).await?;
    Ok((status, Json(record)))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ResumeRecord>, AppError> {
    Ok(Json(state.gateway.load(id, &user).await?))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateResumeRequest>,
) -> Result<Json<ResumeRecord>, AppError> {
    let request = SaveRequest {
        id: Some(id),
        title: req.title,
        sections: req.sections,
    };
    Ok(Json(state.gateway.save(request, &user).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.gateway.delete(id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
