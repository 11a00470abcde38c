/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// SQLite connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing session cookies. Required — the process must
    /// never serve with an implicit key. Env var: `SESSION_SECRET`.
    pub session_secret: String,
    /// Public base URL used to build login links (e.g. "https://example.com").
    /// Env var: `BASE_URL`.
    pub base_url: String,
    /// Whether session cookies carry the `Secure` attribute. True when
    /// `APP_ENV` is `production`.
    pub secure_cookies: bool,
    /// TCP port to listen on (default 3000). Env var: `API_PORT`.
    pub api_port: u16,
    /// Hours past expiry before a login token is eligible for purge
    /// (default 24). Env var: `TOKEN_RETENTION_HOURS`.
    pub token_retention_hours: i64,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/planner.db?mode=rwc".to_owned()),
            session_secret: std::env::var("SESSION_SECRET").expect("SESSION_SECRET"),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_owned()),
            secure_cookies: std::env::var("APP_ENV")
                .map(|v| v == "production")
                .unwrap_or(false),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            token_retention_hours: std::env::var("TOKEN_RETENTION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
        }
    }
}
