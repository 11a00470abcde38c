use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use planner_core::serde::to_rfc3339_ms;

use crate::error::ApiError;
use crate::handlers::current_user_id;
use crate::handlers::event::AttendeeDto;
use crate::state::AppState;
use crate::usecase::calendar::CalendarUseCase;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarUserDto {
    pub id: i32,
    pub display_name: String,
}

/// One entry in the merged feed, discriminated by `kind`.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CalendarItem {
    #[serde(rename = "availability", rename_all = "camelCase")]
    Availability {
        id: i32,
        user_id: i32,
        user_name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
        color: &'static str,
        can_edit: bool,
    },
    #[serde(rename = "event", rename_all = "camelCase")]
    Event {
        id: i32,
        title: String,
        description: String,
        location: Option<String>,
        #[serde(serialize_with = "to_rfc3339_ms")]
        start: DateTime<Utc>,
        #[serde(serialize_with = "to_rfc3339_ms")]
        end: DateTime<Utc>,
        status: &'static str,
        creator_name: String,
        color: &'static str,
        attendees: Vec<AttendeeDto>,
        rsvp_status: Option<&'static str>,
        can_edit: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub current_user_id: Option<i32>,
    pub users: Vec<CalendarUserDto>,
    pub items: Vec<CalendarItem>,
}

/// `GET /api/calendar` — the merged feed. Readable anonymously; a session
/// only adds the viewer-specific `canEdit` and `rsvpStatus` fields.
pub async fn calendar(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<CalendarResponse>, ApiError> {
    let viewer = current_user_id(&jar, &state);
    let usecase = CalendarUseCase {
        users: state.user_repo(),
        periods: state.blocked_period_repo(),
        events: state.event_repo(),
    };
    let data = usecase.execute().await?;

    let names: std::collections::HashMap<i32, String> = data
        .users
        .iter()
        .map(|u| (u.id, u.display_name.clone()))
        .collect();

    let mut items = Vec::with_capacity(data.periods.len() + data.events.len());
    for period in data.periods {
        items.push(CalendarItem::Availability {
            id: period.id,
            user_id: period.user_id,
            user_name: names.get(&period.user_id).cloned().unwrap_or_default(),
            start_date: period.start_date,
            end_date: period.end_date,
            reason: period.reason,
            color: "gray",
            can_edit: viewer == Some(period.user_id),
        });
    }
    for (event, attendees) in data.events {
        let rsvp_status = viewer.and_then(|viewer| {
            attendees
                .iter()
                .find(|a| a.user_id == viewer)
                .map(|a| a.status.as_str())
        });
        items.push(CalendarItem::Event {
            id: event.id,
            title: event.title,
            description: event.description,
            location: event.location,
            start: event.starts_at,
            end: event.ends_at,
            status: event.status.as_str(),
            creator_name: names.get(&event.created_by).cloned().unwrap_or_default(),
            color: "blue",
            attendees: attendees.into_iter().map(AttendeeDto::from).collect(),
            rsvp_status,
            can_edit: viewer == Some(event.created_by),
        });
    }

    Ok(Json(CalendarResponse {
        current_user_id: viewer,
        users: data
            .users
            .into_iter()
            .map(|u| CalendarUserDto {
                id: u.id,
                display_name: u.display_name,
            })
            .collect(),
        items,
    }))
}
