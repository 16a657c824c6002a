use crate::services::auth;
use crate::web::{self, AppState};
use crate::{Config, Database};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub async fn run(config_path: &Path, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open_with_pool_size(&config.database.path, config.database.pool_size)?;

    db.migrate()?;

    if !auth::has_users(&db)? {
        tracing::warn!("No users yet. Create one with 'folio user add'");
    }

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let state = Arc::new(AppState::new(config, db)?);

    let sweeper_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            sweeper_state.login_throttle.cleanup();
            match auth::cleanup_expired_sessions(&sweeper_state.db) {
                Ok(count) if count > 0 => {
                    tracing::info!("Session sweeper: {} expired session(s) removed", count)
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Session sweeper failed: {}", e),
            }
        }
    });

    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server at http://{}", addr);

    web::serve(state, &addr).await?;

    Ok(())
}
