use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::atomic::AtomicUsize;
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppError;

pub type DbPool = SqlitePool;

/// Application state shared by every command
pub struct AppState {
  pub db: DbPool,
  /// Rotation cursor for motivational messages
  pub message_cursor: AtomicUsize,
}

impl AppState {
  pub fn new(db: DbPool) -> Self {
    Self {
      db,
      message_cursor: AtomicUsize::new(0),
    }
  }
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(config: &AppConfig) -> Result<DbPool, AppError> {
  info!(url = %config.database_url, "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(config.max_connections)
    .connect(&config.database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("Database initialized successfully");

  Ok(pool)
}
