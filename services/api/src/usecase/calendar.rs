use crate::domain::repository::{BlockedPeriodRepository, EventRepository, UserRepository};
use crate::domain::types::{Attendee, BlockedPeriod, Event, User};
use crate::error::ApiError;

/// Everything the merged calendar feed needs in one pass: all users, all
/// blocked periods, and all events with their attendees. The handler layers
/// viewer-specific bits (`canEdit`, `rsvpStatus`) on top.
pub struct CalendarData {
    pub users: Vec<User>,
    pub periods: Vec<BlockedPeriod>,
    pub events: Vec<(Event, Vec<Attendee>)>,
}

pub struct CalendarUseCase<U, B, E>
where
    U: UserRepository,
    B: BlockedPeriodRepository,
    E: EventRepository,
{
    pub users: U,
    pub periods: B,
    pub events: E,
}

impl<U, B, E> CalendarUseCase<U, B, E>
where
    U: UserRepository,
    B: BlockedPeriodRepository,
    E: EventRepository,
{
    pub async fn execute(&self) -> Result<CalendarData, ApiError> {
        let users = self.users.list_all().await?;
        let periods = self.periods.list_all().await?;
        let all_events = self.events.list_in_range(None, None).await?;

        let ids: Vec<i32> = all_events.iter().map(|e| e.id).collect();
        let mut attendees = self.events.attendees_for_events(&ids).await?;
        let mut events = Vec::with_capacity(all_events.len());
        for event in all_events {
            let (own, rest): (Vec<Attendee>, Vec<Attendee>) = attendees
                .into_iter()
                .partition(|a| a.event_id == event.id);
            attendees = rest;
            events.push((event, own));
        }

        Ok(CalendarData {
            users,
            periods,
            events,
        })
    }
}
