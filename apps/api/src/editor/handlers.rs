use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{ApiJson, ApiQuery};
use crate::layout::preview::{render_preview, LayoutMode, PreviewLayout};
use crate::layout::style::{resolve, CustomizationOptions, DerivedStyle};
use crate::models::resume::ResumeDocument;
use crate::models::user::CurrentUser;
use crate::session::{EditingSession, SessionAction, SessionSnapshot, SessionView};
use crate::state::AppState;

/// Navigation parameters: `id` selects the record, `type` the layout mode.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub id: Option<Uuid>,
    #[serde(rename = "type")]
    pub layout: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub session: SessionSnapshot,
    #[serde(default)]
    pub actions: Vec<SessionAction>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub document: ResumeDocument,
    #[serde(default)]
    pub customization: CustomizationOptions,
    #[serde(default)]
    pub mode: LayoutMode,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub style: DerivedStyle,
    pub preview: PreviewLayout,
}

/// GET /api/v1/session
/// Opens the editor: the stored record when `id` is given, a blank document otherwise.
pub async fn handle_open_session(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiQuery(params): ApiQuery<SessionQuery>,
) -> Result<Json<SessionView>, AppError> {
    let mode = LayoutMode::from_param(params.layout.as_deref());
    let session = match params.id {
        Some(id) => {
            let record = state.gateway.load(id, &user).await?;
            EditingSession::from_record(user, record, mode)
        }
        None => EditingSession::new(user, mode),
    };
    Ok(Json(session.view()))
}

/// POST /api/v1/editor/apply
pub async fn handle_apply(
    user: CurrentUser,
    ApiJson(req): ApiJson<ApplyRequest>,
) -> Result<Json<SessionView>, AppError> {
    let count = req.actions.len();
    let mut session = EditingSession::from_snapshot(user, req.session);
    session.apply_all(req.actions)?;
    debug!("Applied {count} editor actions");
    Ok(Json(session.view()))
}

/// POST /api/v1/session/save
/// Persists the posted session and returns it with the record id adopted.
/// Local edits in the snapshot are returned untouched whether or not the save succeeds.
pub async fn handle_save_session(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(snapshot): ApiJson<SessionSnapshot>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = EditingSession::from_snapshot(user.clone(), snapshot);
    let record = state.gateway.save(session.save_request(), &user).await?;
    session.record_saved(&record);
    debug!("Session saved as resume {:?}", session.id());
    Ok(Json(session.view()))
}

/// POST /api/v1/preview
pub async fn handle_preview(
    _user: CurrentUser,
    ApiJson(req): ApiJson<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let document = req.document.normalized();
    let style = resolve(&req.customization.normalized());
    let preview = render_preview(&document, &style, req.mode);
    Ok(Json(PreviewResponse { style, preview }))
}
