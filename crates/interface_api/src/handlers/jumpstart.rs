//! Jumpstart session handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use core_kernel::{AssetId, JumpstartSessionId};
use domain_jumpstart::JumpstartMode;

use crate::auth::AuthUser;
use crate::dto::jumpstart::{
    ActiveSessionResponse, CompletePromptRequest, SessionResponse, StartSessionRequest,
};
use crate::{error::ApiError, AppState};

/// Starts a guided capture session in the chosen mode
pub async fn start_session(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<ActiveSessionResponse>), ApiError> {
    let mode = request.mode.parse::<JumpstartMode>()?;
    let active = state.jumpstart.start_session(user_id, mode).await?;

    Ok((
        StatusCode::CREATED,
        Json(ActiveSessionResponse::from_active(active)),
    ))
}

/// The caller's resumable session, or 204 when there is none
pub async fn active_session(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, ApiError> {
    match state.jumpstart.resume_active_session(user_id).await? {
        Some(active) => Ok(Json(ActiveSessionResponse::from_active(active)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Completes the session's current prompt with the captured item
pub async fn complete_prompt(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CompletePromptRequest>,
) -> Result<Json<ActiveSessionResponse>, ApiError> {
    let active = state
        .jumpstart
        .complete_prompt(
            user_id,
            JumpstartSessionId::from(id),
            request.asset_id.map(AssetId::from),
            request.value,
        )
        .await?;

    Ok(Json(ActiveSessionResponse::from_active(active)))
}

/// Skips the session's current prompt
pub async fn skip_prompt(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ActiveSessionResponse>, ApiError> {
    let active = state
        .jumpstart
        .skip_prompt(user_id, JumpstartSessionId::from(id))
        .await?;

    Ok(Json(ActiveSessionResponse::from_active(active)))
}

/// Marks the session completed
pub async fn complete_session(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state
        .jumpstart
        .complete_session(user_id, JumpstartSessionId::from(id))
        .await?;

    Ok(Json(SessionResponse::from_session(session)))
}

/// Dismisses the session, removing it from resumption
pub async fn dismiss_session(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .jumpstart
        .dismiss_session(user_id, JumpstartSessionId::from(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
