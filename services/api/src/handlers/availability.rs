use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use planner_core::serde::to_rfc3339_ms;

use crate::domain::types::BlockedPeriod;
use crate::error::ApiError;
use crate::handlers::require_user;
use crate::state::AppState;
use crate::usecase::availability::{
    CreateBlockedPeriodInput, CreateBlockedPeriodUseCase, DeleteBlockedPeriodUseCase,
    ListMyBlockedPeriodsUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDto {
    pub id: i32,
    pub user_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<BlockedPeriod> for PeriodDto {
    fn from(period: BlockedPeriod) -> Self {
        Self {
            id: period.id,
            user_id: period.user_id,
            start_date: period.start_date,
            end_date: period.end_date,
            reason: period.reason,
            created_at: period.created_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePeriodRequest {
    pub start_date: String,
    pub end_date: String,
    pub reason: Option<String>,
}

/// `POST /api/availability`
pub async fn create_period(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CreatePeriodRequest>,
) -> Result<(StatusCode, Json<PeriodDto>), ApiError> {
    let user_id = require_user(&jar, &state)?;
    let usecase = CreateBlockedPeriodUseCase {
        periods: state.blocked_period_repo(),
    };
    let period = usecase
        .execute(
            user_id,
            CreateBlockedPeriodInput {
                start_date: body.start_date,
                end_date: body.end_date,
                reason: body.reason,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(period.into())))
}

#[derive(Deserialize)]
pub struct RangeParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// `GET /api/availability/me?from&to`
pub async fn list_my_periods(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<PeriodDto>>, ApiError> {
    let user_id = require_user(&jar, &state)?;
    let usecase = ListMyBlockedPeriodsUseCase {
        periods: state.blocked_period_repo(),
    };
    let periods = usecase.execute(user_id, params.from, params.to).await?;
    Ok(Json(periods.into_iter().map(PeriodDto::from).collect()))
}

/// `DELETE /api/availability/{id}` — owner only.
pub async fn delete_period(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user_id = require_user(&jar, &state)?;
    let usecase = DeleteBlockedPeriodUseCase {
        periods: state.blocked_period_repo(),
    };
    usecase.execute(user_id, id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
