use chrono::{DateTime, NaiveDate, Utc};

/// A registered user. Sign-up is out of band (seeded or admin-created);
/// the service only looks users up.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// A single-use login token backing a magic link. The token string itself is
/// the primary key — no surrogate id.
#[derive(Debug, Clone)]
pub struct LoginToken {
    pub token: String,
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of attempting to consume a login token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    Granted { user_id: i32 },
    Rejected(ConsumeRejection),
}

/// Why a consume attempt was rejected. Surfaced distinctly to the login page
/// so the user knows whether to request a fresh link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeRejection {
    NotFound,
    Expired,
    Consumed,
}

impl ConsumeRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::Consumed => "consumed",
        }
    }
}

/// A date range during which a user is unavailable. Inclusive on both ends.
#[derive(Debug, Clone)]
pub struct BlockedPeriod {
    pub id: i32,
    pub user_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A proposed or confirmed group event.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: i32,
    pub created_by: i32,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Proposed,
    Confirmed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "proposed" => Some(Self::Proposed),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// One user's RSVP on one event.
#[derive(Debug, Clone)]
pub struct Attendee {
    pub event_id: i32,
    pub user_id: i32,
    pub display_name: String,
    pub status: AttendeeStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendeeStatus {
    Invited,
    Going,
    Maybe,
    Declined,
}

impl AttendeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invited => "invited",
            Self::Going => "going",
            Self::Maybe => "maybe",
            Self::Declined => "declined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "invited" => Some(Self::Invited),
            "going" => Some(Self::Going),
            "maybe" => Some(Self::Maybe),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }
}

/// Login-token entropy in bytes (hex-encoded, so the token string is twice
/// this long).
pub const LOGIN_TOKEN_BYTES: usize = 32;

/// Default login-token time-to-live in minutes.
pub const LOGIN_TOKEN_TTL_MINUTES: i64 = 30;
