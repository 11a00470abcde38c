use crate::domain::dates::{parse_date, validate_date_range};
use crate::domain::repository::BlockedPeriodRepository;
use crate::domain::types::BlockedPeriod;
use crate::error::ApiError;

pub struct CreateBlockedPeriodInput {
    pub start_date: String,
    pub end_date: String,
    pub reason: Option<String>,
}

pub struct CreateBlockedPeriodUseCase<B>
where
    B: BlockedPeriodRepository,
{
    pub periods: B,
}

impl<B> CreateBlockedPeriodUseCase<B>
where
    B: BlockedPeriodRepository,
{
    pub async fn execute(
        &self,
        user_id: i32,
        input: CreateBlockedPeriodInput,
    ) -> Result<BlockedPeriod, ApiError> {
        let start = parse_date(&input.start_date)?;
        let end = parse_date(&input.end_date)?;
        validate_date_range(start, end)?;

        let reason = input
            .reason
            .map(|r| r.trim().to_owned())
            .filter(|r| !r.is_empty());
        self.periods.create(user_id, start, end, reason).await
    }
}

pub struct ListMyBlockedPeriodsUseCase<B>
where
    B: BlockedPeriodRepository,
{
    pub periods: B,
}

impl<B> ListMyBlockedPeriodsUseCase<B>
where
    B: BlockedPeriodRepository,
{
    pub async fn execute(
        &self,
        user_id: i32,
        from: Option<String>,
        to: Option<String>,
    ) -> Result<Vec<BlockedPeriod>, ApiError> {
        let from = from.as_deref().map(parse_date).transpose()?;
        let to = to.as_deref().map(parse_date).transpose()?;
        if let (Some(from), Some(to)) = (from, to) {
            validate_date_range(from, to)?;
        }
        self.periods.list_for_user(user_id, from, to).await
    }
}

pub struct DeleteBlockedPeriodUseCase<B>
where
    B: BlockedPeriodRepository,
{
    pub periods: B,
}

impl<B> DeleteBlockedPeriodUseCase<B>
where
    B: BlockedPeriodRepository,
{
    pub async fn execute(&self, user_id: i32, period_id: i32) -> Result<(), ApiError> {
        // Owner-only: look up first so an existing period owned by someone
        // else is a 403, not a silent no-op.
        let period = self
            .periods
            .find_by_id(period_id)
            .await?
            .ok_or(ApiError::PeriodNotFound)?;
        if period.user_id != user_id {
            return Err(ApiError::Forbidden);
        }
        self.periods.delete(period_id).await?;
        Ok(())
    }
}
