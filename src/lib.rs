//! Daily Grind backend
//!
//! Weekly workout schedules, profiles and the 22-tier progression ladder.
//! The command layer in [`commands`] is what a transport calls into; the
//! rest are the stores and the pure tier engine behind it.

pub mod analysis;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod messages;
pub mod models;
pub mod profile;
pub mod progression;
pub mod schedule;
pub mod tiers;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use db::AppState;
use error::AppError;

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing(filter: &str) {
  let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
  let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load `.env` and the environment, then bring up the database
pub async fn start() -> Result<Arc<AppState>, AppError> {
  dotenvy::dotenv().ok();
  let config = AppConfig::from_env()?;
  start_with(&config).await
}

pub async fn start_with(config: &AppConfig) -> Result<Arc<AppState>, AppError> {
  init_tracing(&config.log_filter);

  let pool = db::initialize_db(config).await?;
  profile::bootstrap_admins(&pool, &config.admin_principals).await?;

  info!(admins = config.admin_principals.len(), "Daily Grind ready");
  Ok(Arc::new(AppState::new(pool)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::commands::{profile::is_caller_admin, Caller};

  #[tokio::test]
  async fn test_start_with_bootstraps_admins() {
    let config = AppConfig {
      database_url: "sqlite::memory:".to_string(),
      max_connections: 1,
      admin_principals: vec!["root".to_string()],
      ..AppConfig::default()
    };

    let state = start_with(&config).await.expect("Should start");

    assert!(is_caller_admin(&state, &Caller::authenticated("root")).await.unwrap());
    assert!(!is_caller_admin(&state, &Caller::authenticated("user-a")).await.unwrap());

    state.db.close().await;
  }
}
