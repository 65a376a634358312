use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub screener_url: String,
    pub screener_api_key: Option<String>,
    pub mailer_url: Option<String>,
    pub mailer_api_key: Option<String>,
    pub admin_email: String,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://makerstreet.db?mode=rwc".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            screener_url: env::var("SCREENER_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:9090".to_string()),
            screener_api_key: env::var("SCREENER_API_KEY").ok(),
            mailer_url: env::var("MAILER_URL").ok(),
            mailer_api_key: env::var("MAILER_API_KEY").ok(),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "moderation@makerstreet.local".to_string()),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
        }
    }
}
