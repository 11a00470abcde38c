use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use planner_core::serde::to_rfc3339_ms;

use crate::domain::types::Attendee;
use crate::error::ApiError;
use crate::handlers::require_user;
use crate::state::AppState;
use crate::usecase::event::{
    CreateEventInput, CreateEventUseCase, DeleteEventUseCase, EventDetail, GetEventUseCase,
    ListEventsUseCase, RsvpUseCase, UpdateEventInput, UpdateEventUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeDto {
    pub user_id: i32,
    pub name: String,
    pub status: &'static str,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Attendee> for AttendeeDto {
    fn from(attendee: Attendee) -> Self {
        Self {
            user_id: attendee.user_id,
            name: attendee.display_name,
            status: attendee.status.as_str(),
            updated_at: attendee.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub id: i32,
    pub created_by: i32,
    pub creator_name: String,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub start: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub end: DateTime<Utc>,
    pub status: &'static str,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    pub attendees: Vec<AttendeeDto>,
}

impl From<EventDetail> for EventDto {
    fn from(detail: EventDetail) -> Self {
        Self {
            id: detail.event.id,
            created_by: detail.event.created_by,
            creator_name: detail.creator_name,
            title: detail.event.title,
            description: detail.event.description,
            location: detail.event.location,
            start: detail.event.starts_at,
            end: detail.event.ends_at,
            status: detail.event.status.as_str(),
            created_at: detail.event.created_at,
            attendees: detail.attendees.into_iter().map(AttendeeDto::from).collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct RangeParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// `GET /api/events?from&to` — readable without a session.
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<EventDto>>, ApiError> {
    let usecase = ListEventsUseCase {
        users: state.user_repo(),
        events: state.event_repo(),
    };
    let details = usecase.execute(params.from, params.to).await?;
    Ok(Json(details.into_iter().map(EventDto::from).collect()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: String,
    pub end: String,
    pub status: Option<String>,
    #[serde(default)]
    pub invitees: Vec<i32>,
}

/// `POST /api/events`
pub async fn create_event(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventDto>), ApiError> {
    let user_id = require_user(&jar, &state)?;
    let usecase = CreateEventUseCase {
        users: state.user_repo(),
        events: state.event_repo(),
    };
    let detail = usecase
        .execute(
            user_id,
            CreateEventInput {
                title: body.title,
                description: body.description,
                location: body.location,
                start: body.start,
                end: body.end,
                status: body.status,
                invitees: body.invitees,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// `GET /api/events/{id}`
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EventDto>, ApiError> {
    let usecase = GetEventUseCase {
        users: state.user_repo(),
        events: state.event_repo(),
    };
    let detail = usecase.execute(id).await?;
    Ok(Json(detail.into()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub status: Option<String>,
    pub invitees: Option<Vec<i32>>,
}

/// `PATCH /api/events/{id}` — creator only.
pub async fn update_event(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
    Json(body): Json<UpdateEventRequest>,
) -> Result<Json<EventDto>, ApiError> {
    let user_id = require_user(&jar, &state)?;
    let usecase = UpdateEventUseCase {
        users: state.user_repo(),
        events: state.event_repo(),
    };
    let detail = usecase
        .execute(
            user_id,
            id,
            UpdateEventInput {
                title: body.title,
                description: body.description,
                location: body.location,
                start: body.start,
                end: body.end,
                status: body.status,
                invitees: body.invitees,
            },
        )
        .await?;
    Ok(Json(detail.into()))
}

/// `DELETE /api/events/{id}` — creator only.
pub async fn delete_event(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = require_user(&jar, &state)?;
    let usecase = DeleteEventUseCase {
        events: state.event_repo(),
    };
    usecase.execute(user_id, id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Deserialize)]
pub struct RsvpRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct RsvpResponse {
    pub success: bool,
    pub attendees: Vec<AttendeeDto>,
}

/// `POST /api/events/{id}/rsvp`
pub async fn rsvp(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
    Json(body): Json<RsvpRequest>,
) -> Result<Json<RsvpResponse>, ApiError> {
    let user_id = require_user(&jar, &state)?;
    let usecase = RsvpUseCase {
        events: state.event_repo(),
    };
    let attendees = usecase.execute(user_id, id, &body.status).await?;
    Ok(Json(RsvpResponse {
        success: true,
        attendees: attendees.into_iter().map(AttendeeDto::from).collect(),
    }))
}
