//! Application state shared across all handlers

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::mailer::Mailer;
use crate::screener::ScreenerClient;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub screener: ScreenerClient,
    pub mailer: Mailer,
    pub admin_email: String,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        screener: ScreenerClient,
        mailer: Mailer,
        admin_email: String,
    ) -> Self {
        Self {
            db,
            screener,
            mailer,
            admin_email,
        }
    }

    pub fn from_config(db: DatabaseConnection, config: &Config) -> Result<Self, String> {
        let screener = ScreenerClient::new(&config.screener_url, config.screener_api_key.clone())?;
        let mailer = Mailer::new(config.mailer_url.clone(), config.mailer_api_key.clone())?;
        Ok(Self::new(db, screener, mailer, config.admin_email.clone()))
    }
}

// Implement FromRef to allow extracting DatabaseConnection from AppState
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
