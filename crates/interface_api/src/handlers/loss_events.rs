//! Loss event handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{LossEventId, PropertyId};
use domain_loss::{LossEventType, NewLossEvent};

use crate::auth::AuthUser;
use crate::dto::loss_events::{LossEventResponse, ReportLossEventRequest};
use crate::{error::ApiError, AppState};

/// Reports a new loss event, opening its sixty-day filing window
pub async fn report_event(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<ReportLossEventRequest>,
) -> Result<(StatusCode, Json<LossEventResponse>), ApiError> {
    request.validate()?;
    let event_type = request.event_type.parse::<LossEventType>()?;

    let input = NewLossEvent {
        user_id,
        property_id: request.property_id.map(PropertyId::from),
        event_type,
        event_date: request.event_date,
        discovery_date: request.discovery_date,
        description: request.description,
        police_report_number: request.police_report_number,
        fire_report_number: request.fire_report_number,
        estimated_loss: request.estimated_loss,
    };

    let event = state.loss_events.report_event(input).await?;
    let today = Utc::now().date_naive();

    Ok((
        StatusCode::CREATED,
        Json(LossEventResponse::from_event(event, today)),
    ))
}

/// Lists the caller's loss events, most recently discovered first
pub async fn list_events(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<LossEventResponse>>, ApiError> {
    let events = state.loss_events.list_events(user_id).await?;
    let today = Utc::now().date_naive();

    Ok(Json(
        events
            .into_iter()
            .map(|event| LossEventResponse::from_event(event, today))
            .collect(),
    ))
}

/// Gets one of the caller's loss events by ID
pub async fn get_event(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<LossEventResponse>, ApiError> {
    let event = state
        .loss_events
        .get_event(user_id, LossEventId::from(id))
        .await?;
    let today = Utc::now().date_naive();

    Ok(Json(LossEventResponse::from_event(event, today)))
}
