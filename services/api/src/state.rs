use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbBlockedPeriodRepository, DbEventRepository, DbLoginTokenRepository, DbUserRepository,
};

/// Shared application state passed to every handler via axum `State`.
///
/// The database connection is built once in `main` and handed to the
/// repositories explicitly; nothing reaches for a process-global handle.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub session_secret: String,
    pub base_url: String,
    pub secure_cookies: bool,
    pub token_retention_hours: i64,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn login_token_repo(&self) -> DbLoginTokenRepository {
        DbLoginTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn blocked_period_repo(&self) -> DbBlockedPeriodRepository {
        DbBlockedPeriodRepository {
            db: self.db.clone(),
        }
    }

    pub fn event_repo(&self) -> DbEventRepository {
        DbEventRepository {
            db: self.db.clone(),
        }
    }
}
