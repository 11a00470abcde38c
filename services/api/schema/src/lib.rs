//! sea-orm entities for the planner database.

pub mod blocked_periods;
pub mod event_attendees;
pub mod events;
pub mod login_tokens;
pub mod users;
