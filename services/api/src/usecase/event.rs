use chrono::Utc;

use crate::domain::dates::{parse_datetime, validate_time_range};
use crate::domain::repository::{EventPatch, EventRepository, NewEvent, UserRepository};
use crate::domain::types::{Attendee, AttendeeStatus, Event, EventStatus};
use crate::error::ApiError;

/// An event with the extras the API returns alongside it.
pub struct EventDetail {
    pub event: Event,
    pub creator_name: String,
    pub attendees: Vec<Attendee>,
}

pub struct CreateEventInput {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: String,
    pub end: String,
    pub status: Option<String>,
    pub invitees: Vec<i32>,
}

pub struct CreateEventUseCase<U, E>
where
    U: UserRepository,
    E: EventRepository,
{
    pub users: U,
    pub events: E,
}

impl<U, E> CreateEventUseCase<U, E>
where
    U: UserRepository,
    E: EventRepository,
{
    pub async fn execute(&self, user_id: i32, input: CreateEventInput) -> Result<EventDetail, ApiError> {
        let title = input.title.trim().to_owned();
        if title.is_empty() {
            return Err(ApiError::InvalidInput("title must not be empty".to_owned()));
        }
        let starts_at = parse_datetime(&input.start)?;
        let ends_at = parse_datetime(&input.end)?;
        validate_time_range(starts_at, ends_at)?;
        let status = match input.status.as_deref() {
            Some(s) => EventStatus::parse(s)
                .ok_or_else(|| ApiError::InvalidInput(format!("invalid status: {s}")))?,
            None => EventStatus::Proposed,
        };

        // The creator is always an attendee; drop them from the invitee list
        // so the attendee insert stays conflict-free.
        let invitees: Vec<i32> = input
            .invitees
            .into_iter()
            .filter(|id| *id != user_id)
            .collect();

        let event = self
            .events
            .create(
                &NewEvent {
                    created_by: user_id,
                    title,
                    description: input.description.unwrap_or_default(),
                    location: input.location,
                    starts_at,
                    ends_at,
                    status,
                    invitees,
                },
                Utc::now(),
            )
            .await?;

        detail(&self.users, &self.events, event).await
    }
}

pub struct GetEventUseCase<U, E>
where
    U: UserRepository,
    E: EventRepository,
{
    pub users: U,
    pub events: E,
}

impl<U, E> GetEventUseCase<U, E>
where
    U: UserRepository,
    E: EventRepository,
{
    pub async fn execute(&self, event_id: i32) -> Result<EventDetail, ApiError> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(ApiError::EventNotFound)?;
        detail(&self.users, &self.events, event).await
    }
}

pub struct ListEventsUseCase<U, E>
where
    U: UserRepository,
    E: EventRepository,
{
    pub users: U,
    pub events: E,
}

impl<U, E> ListEventsUseCase<U, E>
where
    U: UserRepository,
    E: EventRepository,
{
    pub async fn execute(
        &self,
        from: Option<String>,
        to: Option<String>,
    ) -> Result<Vec<EventDetail>, ApiError> {
        let from = from.as_deref().map(parse_datetime).transpose()?;
        let to = to.as_deref().map(parse_datetime).transpose()?;
        let events = self.events.list_in_range(from, to).await?;
        details_for(&self.users, &self.events, events).await
    }
}

pub struct UpdateEventInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub status: Option<String>,
    pub invitees: Option<Vec<i32>>,
}

pub struct UpdateEventUseCase<U, E>
where
    U: UserRepository,
    E: EventRepository,
{
    pub users: U,
    pub events: E,
}

impl<U, E> UpdateEventUseCase<U, E>
where
    U: UserRepository,
    E: EventRepository,
{
    pub async fn execute(
        &self,
        user_id: i32,
        event_id: i32,
        input: UpdateEventInput,
    ) -> Result<EventDetail, ApiError> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(ApiError::EventNotFound)?;
        if event.created_by != user_id {
            return Err(ApiError::Forbidden);
        }

        if let Some(title) = &input.title {
            if title.trim().is_empty() {
                return Err(ApiError::InvalidInput("title must not be empty".to_owned()));
            }
        }
        let starts_at = input.start.as_deref().map(parse_datetime).transpose()?;
        let ends_at = input.end.as_deref().map(parse_datetime).transpose()?;
        // Each bound falls back to the stored value so a one-sided patch
        // cannot invert the range.
        validate_time_range(
            starts_at.unwrap_or(event.starts_at),
            ends_at.unwrap_or(event.ends_at),
        )?;
        let status = match input.status.as_deref() {
            Some(s) => Some(
                EventStatus::parse(s)
                    .ok_or_else(|| ApiError::InvalidInput(format!("invalid status: {s}")))?,
            ),
            None => None,
        };

        let patch = EventPatch {
            title: input.title.map(|t| t.trim().to_owned()),
            description: input.description,
            location: input.location,
            starts_at,
            ends_at,
            status,
        };
        if !patch.is_empty() {
            self.events.update(event_id, &patch).await?;
        }
        if let Some(invitees) = input.invitees {
            let invitees: Vec<i32> = invitees
                .into_iter()
                .filter(|id| *id != event.created_by)
                .collect();
            self.events
                .set_invitees(event_id, event.created_by, &invitees, Utc::now())
                .await?;
        }

        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(ApiError::EventNotFound)?;
        detail(&self.users, &self.events, event).await
    }
}

pub struct DeleteEventUseCase<E>
where
    E: EventRepository,
{
    pub events: E,
}

impl<E> DeleteEventUseCase<E>
where
    E: EventRepository,
{
    pub async fn execute(&self, user_id: i32, event_id: i32) -> Result<(), ApiError> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(ApiError::EventNotFound)?;
        if event.created_by != user_id {
            return Err(ApiError::Forbidden);
        }
        self.events.delete(event_id).await
    }
}

pub struct RsvpUseCase<E>
where
    E: EventRepository,
{
    pub events: E,
}

impl<E> RsvpUseCase<E>
where
    E: EventRepository,
{
    /// Upsert the caller's RSVP and return the refreshed attendee list. Any
    /// authenticated user may RSVP, invited or not.
    pub async fn execute(
        &self,
        user_id: i32,
        event_id: i32,
        status: &str,
    ) -> Result<Vec<Attendee>, ApiError> {
        let status = AttendeeStatus::parse(status)
            .ok_or_else(|| ApiError::InvalidInput(format!("invalid rsvp status: {status}")))?;
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(ApiError::EventNotFound)?;
        self.events
            .upsert_rsvp(event_id, user_id, status, Utc::now())
            .await?;
        self.events.attendees(event_id).await
    }
}

async fn detail<U, E>(users: &U, events: &E, event: Event) -> Result<EventDetail, ApiError>
where
    U: UserRepository,
    E: EventRepository,
{
    let creator_name = users
        .find_by_id(event.created_by)
        .await?
        .map(|u| u.display_name)
        .unwrap_or_default();
    let attendees = events.attendees(event.id).await?;
    Ok(EventDetail {
        event,
        creator_name,
        attendees,
    })
}

async fn details_for<U, E>(
    users: &U,
    events: &E,
    list: Vec<Event>,
) -> Result<Vec<EventDetail>, ApiError>
where
    U: UserRepository,
    E: EventRepository,
{
    let ids: Vec<i32> = list.iter().map(|e| e.id).collect();
    let mut attendees = events.attendees_for_events(&ids).await?;
    let users_by_id: std::collections::HashMap<i32, String> = users
        .list_all()
        .await?
        .into_iter()
        .map(|u| (u.id, u.display_name))
        .collect();

    let mut details = Vec::with_capacity(list.len());
    for event in list {
        let (own, rest): (Vec<Attendee>, Vec<Attendee>) = attendees
            .into_iter()
            .partition(|a| a.event_id == event.id);
        attendees = rest;
        let creator_name = users_by_id.get(&event.created_by).cloned().unwrap_or_default();
        details.push(EventDetail {
            event,
            creator_name,
            attendees: own,
        });
    }
    Ok(details)
}
