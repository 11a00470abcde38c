use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

use crate::domain::repository::{LoginTokenRepository, UserRepository};
use crate::domain::types::{
    ConsumeOutcome, LOGIN_TOKEN_BYTES, LOGIN_TOKEN_TTL_MINUTES, LoginToken, User,
};
use crate::error::ApiError;

fn generate_token() -> String {
    let mut bytes = [0u8; LOGIN_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub struct CreateLoginTokenInput {
    pub email: String,
    /// Token lifetime. `None` means the 30-minute default.
    pub ttl_minutes: Option<i64>,
}

pub struct CreatedLoginToken {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct CreateLoginTokenUseCase<U, T>
where
    U: UserRepository,
    T: LoginTokenRepository,
{
    pub users: U,
    pub tokens: T,
}

impl<U, T> CreateLoginTokenUseCase<U, T>
where
    U: UserRepository,
    T: LoginTokenRepository,
{
    pub async fn execute(
        &self,
        input: CreateLoginTokenInput,
    ) -> Result<CreatedLoginToken, ApiError> {
        // 1. Blank email → 400 before any lookup
        if input.email.trim().is_empty() {
            return Err(ApiError::InvalidInput("email is required".to_owned()));
        }

        // 2. Find user by email → 404 if not found
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        // 3. Generate token: 32 random bytes, hex-encoded. The token string
        //    is the primary key, so a collision fails the insert loudly.
        let ttl_minutes = input.ttl_minutes.unwrap_or(LOGIN_TOKEN_TTL_MINUTES);
        let now = Utc::now();
        let token = LoginToken {
            token: generate_token(),
            user_id: user.id,
            expires_at: now + Duration::minutes(ttl_minutes),
            consumed_at: None,
            created_at: now,
        };

        self.tokens.create(&token).await?;
        Ok(CreatedLoginToken {
            user,
            token: token.token,
            expires_at: token.expires_at,
        })
    }
}

pub struct ConsumeLoginTokenUseCase<T>
where
    T: LoginTokenRepository,
{
    pub tokens: T,
}

impl<T> ConsumeLoginTokenUseCase<T>
where
    T: LoginTokenRepository,
{
    /// Consume the token as of now. Rejections come back as data, not errors;
    /// the handler turns them into login-page redirects.
    pub async fn execute(&self, token: &str) -> Result<ConsumeOutcome, ApiError> {
        self.tokens.consume(token, Utc::now()).await
    }
}

pub struct PurgeExpiredTokensUseCase<T>
where
    T: LoginTokenRepository,
{
    pub tokens: T,
    /// Grace window: tokens stick around this long past expiry so recent
    /// failures are still inspectable in the store.
    pub retention_hours: i64,
}

impl<T> PurgeExpiredTokensUseCase<T>
where
    T: LoginTokenRepository,
{
    pub async fn execute(&self) -> Result<u64, ApiError> {
        let cutoff = Utc::now() - Duration::hours(self.retention_hours);
        self.tokens.delete_expired_before(cutoff).await
    }
}
