#![allow(async_fn_in_trait)]

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::types::{
    Attendee, AttendeeStatus, BlockedPeriod, ConsumeOutcome, Event, EventStatus, LoginToken, User,
};
use crate::error::ApiError;

/// Repository for user lookup. Sign-up is out of band, so there is no create.
pub trait UserRepository: Send + Sync {
    /// Find a user by email, matched case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError>;
    /// All users, for the calendar feed.
    async fn list_all(&self) -> Result<Vec<User>, ApiError>;
}

/// Repository for single-use login tokens.
pub trait LoginTokenRepository: Send + Sync {
    /// Insert a fresh token. The token string is the primary key, so a
    /// collision surfaces as a store error rather than a silent overwrite.
    async fn create(&self, token: &LoginToken) -> Result<(), ApiError>;

    /// Atomically look up, validate, and mark the token consumed. Two
    /// concurrent calls for the same token yield exactly one `Granted`.
    async fn consume(&self, token: &str, now: DateTime<Utc>) -> Result<ConsumeOutcome, ApiError>;

    /// Bulk-delete tokens whose expiry is older than `cutoff`, consumed or
    /// not. Returns the number of rows deleted.
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, ApiError>;
}

/// Repository for blocked-out availability periods.
pub trait BlockedPeriodRepository: Send + Sync {
    async fn create(
        &self,
        user_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> Result<BlockedPeriod, ApiError>;

    /// A user's periods overlapping `[from, to]` (either bound optional).
    async fn list_for_user(
        &self,
        user_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<BlockedPeriod>, ApiError>;

    /// Everyone's periods, for the calendar feed.
    async fn list_all(&self) -> Result<Vec<BlockedPeriod>, ApiError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<BlockedPeriod>, ApiError>;

    /// Delete a period. Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Fields for creating an event. Attendee rows (creator + invitees) are
/// written in the same transaction as the event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub created_by: i32,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: EventStatus,
    pub invitees: Vec<i32>,
}

/// Partial update for an event. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub status: Option<EventStatus>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.starts_at.is_none()
            && self.ends_at.is_none()
            && self.status.is_none()
    }
}

/// Repository for events and their attendee lists.
pub trait EventRepository: Send + Sync {
    /// Insert the event plus its attendee rows (creator as `going`, invitees
    /// as `invited`) in one transaction.
    async fn create(&self, event: &NewEvent, now: DateTime<Utc>) -> Result<Event, ApiError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Event>, ApiError>;

    /// Events overlapping `[from, to]` (either bound optional), ordered by
    /// start time.
    async fn list_in_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Event>, ApiError>;

    async fn update(&self, id: i32, patch: &EventPatch) -> Result<(), ApiError>;

    /// Replace the invitee set, preserving existing RSVPs and keeping the
    /// creator as an attendee.
    async fn set_invitees(
        &self,
        event_id: i32,
        created_by: i32,
        invitees: &[i32],
        now: DateTime<Utc>,
    ) -> Result<(), ApiError>;

    /// Delete the event and its attendee rows in one transaction.
    async fn delete(&self, id: i32) -> Result<(), ApiError>;

    /// Attendees of one event, with display names, ordered by name.
    async fn attendees(&self, event_id: i32) -> Result<Vec<Attendee>, ApiError>;

    /// Attendees across many events in one round trip (calendar feed).
    async fn attendees_for_events(&self, event_ids: &[i32]) -> Result<Vec<Attendee>, ApiError>;

    /// Insert or update one user's RSVP.
    async fn upsert_rsvp(
        &self,
        event_id: i32,
        user_id: i32,
        status: AttendeeStatus,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError>;
}
