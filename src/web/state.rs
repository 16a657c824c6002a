use crate::web::security::LoginThrottle;
use crate::{Config, Database};
use anyhow::Result;

pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub session_days: i64,
    pub login_throttle: LoginThrottle,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let session_days = config.auth.session_days()?;
        Ok(Self {
            config,
            db,
            session_days,
            login_throttle: LoginThrottle::default(),
        })
    }
}
