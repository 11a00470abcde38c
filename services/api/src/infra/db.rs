use std::collections::HashMap;

use anyhow::{Context as _, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use planner_api_schema::{blocked_periods, event_attendees, events, login_tokens, users};

use crate::domain::repository::{
    BlockedPeriodRepository, EventPatch, EventRepository, LoginTokenRepository, NewEvent,
    UserRepository,
};
use crate::domain::types::{
    Attendee, AttendeeStatus, BlockedPeriod, ConsumeOutcome, ConsumeRejection, Event, EventStatus,
    LoginToken, User,
};
use crate::error::ApiError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(users::Column::Email)))
                    .eq(email.trim().to_lowercase()),
            )
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::DisplayName)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        display_name: model.display_name,
        is_admin: model.is_admin,
        created_at: model.created_at,
    }
}

// ── LoginToken repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbLoginTokenRepository {
    pub db: DatabaseConnection,
}

impl LoginTokenRepository for DbLoginTokenRepository {
    async fn create(&self, token: &LoginToken) -> Result<(), ApiError> {
        login_tokens::ActiveModel {
            token: Set(token.token.clone()),
            user_id: Set(token.user_id),
            expires_at: Set(token.expires_at),
            consumed_at: Set(None),
            created_at: Set(token.created_at),
        }
        .insert(&self.db)
        .await
        .context("create login token")?;
        Ok(())
    }

    async fn consume(&self, token: &str, now: DateTime<Utc>) -> Result<ConsumeOutcome, ApiError> {
        let token = token.to_owned();
        let outcome = self
            .db
            .transaction::<_, ConsumeOutcome, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let Some(row) = login_tokens::Entity::find_by_id(token.clone())
                        .one(txn)
                        .await?
                    else {
                        return Ok(ConsumeOutcome::Rejected(ConsumeRejection::NotFound));
                    };
                    if row.consumed_at.is_some() {
                        return Ok(ConsumeOutcome::Rejected(ConsumeRejection::Consumed));
                    }
                    if row.expires_at < now {
                        return Ok(ConsumeOutcome::Rejected(ConsumeRejection::Expired));
                    }
                    // Guarded write: only the transaction that still sees
                    // consumed_at IS NULL wins; a racing loser affects zero
                    // rows and reads as already consumed.
                    let result = login_tokens::Entity::update_many()
                        .col_expr(login_tokens::Column::ConsumedAt, Expr::value(Some(now)))
                        .filter(login_tokens::Column::Token.eq(token))
                        .filter(login_tokens::Column::ConsumedAt.is_null())
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(ConsumeOutcome::Rejected(ConsumeRejection::Consumed));
                    }
                    Ok(ConsumeOutcome::Granted {
                        user_id: row.user_id,
                    })
                })
            })
            .await
            .context("consume login token")?;
        Ok(outcome)
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, ApiError> {
        let result = login_tokens::Entity::delete_many()
            .filter(login_tokens::Column::ExpiresAt.lt(cutoff))
            .exec(&self.db)
            .await
            .context("purge expired login tokens")?;
        Ok(result.rows_affected)
    }
}

// ── BlockedPeriod repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBlockedPeriodRepository {
    pub db: DatabaseConnection,
}

impl BlockedPeriodRepository for DbBlockedPeriodRepository {
    async fn create(
        &self,
        user_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> Result<BlockedPeriod, ApiError> {
        let model = blocked_periods::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            start_date: Set(start_date),
            end_date: Set(end_date),
            reason: Set(reason),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .context("create blocked period")?;
        Ok(period_from_model(model))
    }

    async fn list_for_user(
        &self,
        user_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<BlockedPeriod>, ApiError> {
        let mut query = blocked_periods::Entity::find()
            .filter(blocked_periods::Column::UserId.eq(user_id))
            .order_by_asc(blocked_periods::Column::StartDate);
        // Overlap: a period intersects [from, to] when it ends on or after
        // `from` and starts on or before `to`.
        if let Some(from) = from {
            query = query.filter(blocked_periods::Column::EndDate.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(blocked_periods::Column::StartDate.lte(to));
        }
        let models = query
            .all(&self.db)
            .await
            .context("list blocked periods for user")?;
        Ok(models.into_iter().map(period_from_model).collect())
    }

    async fn list_all(&self) -> Result<Vec<BlockedPeriod>, ApiError> {
        let models = blocked_periods::Entity::find()
            .order_by_asc(blocked_periods::Column::StartDate)
            .all(&self.db)
            .await
            .context("list blocked periods")?;
        Ok(models.into_iter().map(period_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<BlockedPeriod>, ApiError> {
        let model = blocked_periods::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find blocked period by id")?;
        Ok(model.map(period_from_model))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = blocked_periods::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete blocked period")?;
        Ok(result.rows_affected > 0)
    }
}

fn period_from_model(model: blocked_periods::Model) -> BlockedPeriod {
    BlockedPeriod {
        id: model.id,
        user_id: model.user_id,
        start_date: model.start_date,
        end_date: model.end_date,
        reason: model.reason,
        created_at: model.created_at,
    }
}

// ── Event repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEventRepository {
    pub db: DatabaseConnection,
}

impl EventRepository for DbEventRepository {
    async fn create(&self, event: &NewEvent, now: DateTime<Utc>) -> Result<Event, ApiError> {
        let event = event.clone();
        let model = self
            .db
            .transaction::<_, events::Model, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let model = events::ActiveModel {
                        id: NotSet,
                        created_by: Set(event.created_by),
                        title: Set(event.title.clone()),
                        description: Set(event.description.clone()),
                        location: Set(event.location.clone()),
                        starts_at: Set(event.starts_at),
                        ends_at: Set(event.ends_at),
                        status: Set(event.status.as_str().to_owned()),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    insert_attendee(txn, model.id, event.created_by, AttendeeStatus::Going, now)
                        .await?;
                    for invitee in &event.invitees {
                        insert_attendee(txn, model.id, *invitee, AttendeeStatus::Invited, now)
                            .await?;
                    }
                    Ok(model)
                })
            })
            .await
            .context("create event with attendees")?;
        event_from_model(model)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Event>, ApiError> {
        let model = events::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find event by id")?;
        model.map(event_from_model).transpose()
    }

    async fn list_in_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Event>, ApiError> {
        let mut query = events::Entity::find().order_by_asc(events::Column::StartsAt);
        if let Some(from) = from {
            query = query.filter(events::Column::EndsAt.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(events::Column::StartsAt.lte(to));
        }
        let models = query.all(&self.db).await.context("list events")?;
        models.into_iter().map(event_from_model).collect()
    }

    async fn update(&self, id: i32, patch: &EventPatch) -> Result<(), ApiError> {
        let active = events::ActiveModel {
            id: Set(id),
            created_by: NotSet,
            title: patch.title.clone().map_or(NotSet, Set),
            description: patch.description.clone().map_or(NotSet, Set),
            location: patch.location.clone().map_or(NotSet, |l| Set(Some(l))),
            starts_at: patch.starts_at.map_or(NotSet, Set),
            ends_at: patch.ends_at.map_or(NotSet, Set),
            status: patch.status.map_or(NotSet, |s| Set(s.as_str().to_owned())),
            created_at: NotSet,
        };
        active.update(&self.db).await.context("update event")?;
        Ok(())
    }

    async fn set_invitees(
        &self,
        event_id: i32,
        created_by: i32,
        invitees: &[i32],
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let invitees = invitees.to_vec();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let existing: Vec<i32> = event_attendees::Entity::find()
                        .filter(event_attendees::Column::EventId.eq(event_id))
                        .all(txn)
                        .await?
                        .into_iter()
                        .map(|a| a.user_id)
                        .collect();

                    // Keep the creator and everyone still invited (their RSVP
                    // state survives); drop the rest; add newcomers as
                    // `invited`.
                    let mut keep = invitees.clone();
                    keep.push(created_by);
                    event_attendees::Entity::delete_many()
                        .filter(event_attendees::Column::EventId.eq(event_id))
                        .filter(event_attendees::Column::UserId.is_not_in(keep))
                        .exec(txn)
                        .await?;

                    for invitee in invitees {
                        if !existing.contains(&invitee) {
                            insert_attendee(txn, event_id, invitee, AttendeeStatus::Invited, now)
                                .await?;
                        }
                    }
                    Ok(())
                })
            })
            .await
            .context("replace event invitees")?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    event_attendees::Entity::delete_many()
                        .filter(event_attendees::Column::EventId.eq(id))
                        .exec(txn)
                        .await?;
                    events::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(())
                })
            })
            .await
            .context("delete event with attendees")?;
        Ok(())
    }

    async fn attendees(&self, event_id: i32) -> Result<Vec<Attendee>, ApiError> {
        self.attendees_for_events(&[event_id]).await
    }

    async fn attendees_for_events(&self, event_ids: &[i32]) -> Result<Vec<Attendee>, ApiError> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = event_attendees::Entity::find()
            .filter(event_attendees::Column::EventId.is_in(event_ids.to_vec()))
            .all(&self.db)
            .await
            .context("list event attendees")?;

        let user_ids: Vec<i32> = models.iter().map(|m| m.user_id).collect();
        let names: HashMap<i32, String> = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .context("list attendee users")?
            .into_iter()
            .map(|u| (u.id, u.display_name))
            .collect();

        let mut attendees = models
            .into_iter()
            .map(|m| {
                Ok(Attendee {
                    event_id: m.event_id,
                    user_id: m.user_id,
                    display_name: names.get(&m.user_id).cloned().unwrap_or_default(),
                    status: AttendeeStatus::parse(&m.status)
                        .ok_or_else(|| anyhow!("unknown attendee status: {}", m.status))?,
                    updated_at: m.updated_at,
                })
            })
            .collect::<Result<Vec<_>, anyhow::Error>>()?;
        attendees.sort_by(|a, b| {
            (a.event_id, &a.display_name).cmp(&(b.event_id, &b.display_name))
        });
        Ok(attendees)
    }

    async fn upsert_rsvp(
        &self,
        event_id: i32,
        user_id: i32,
        status: AttendeeStatus,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        event_attendees::Entity::insert(event_attendees::ActiveModel {
            event_id: Set(event_id),
            user_id: Set(user_id),
            status: Set(status.as_str().to_owned()),
            updated_at: Set(now),
        })
        .on_conflict(
            OnConflict::columns([
                event_attendees::Column::EventId,
                event_attendees::Column::UserId,
            ])
            .update_columns([
                event_attendees::Column::Status,
                event_attendees::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec(&self.db)
        .await
        .context("upsert rsvp")?;
        Ok(())
    }
}

async fn insert_attendee(
    txn: &DatabaseTransaction,
    event_id: i32,
    user_id: i32,
    status: AttendeeStatus,
    now: DateTime<Utc>,
) -> Result<(), sea_orm::DbErr> {
    event_attendees::ActiveModel {
        event_id: Set(event_id),
        user_id: Set(user_id),
        status: Set(status.as_str().to_owned()),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn event_from_model(model: events::Model) -> Result<Event, ApiError> {
    let status = EventStatus::parse(&model.status)
        .ok_or_else(|| anyhow!("unknown event status: {}", model.status))?;
    Ok(Event {
        id: model.id,
        created_by: model.created_by,
        title: model.title,
        description: model.description,
        location: model.location,
        starts_at: model.starts_at,
        ends_at: model.ends_at,
        status,
        created_at: model.created_at,
    })
}
