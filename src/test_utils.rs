//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Seed helpers for profiles and schedules

use chrono::Utc;
use sqlx::SqlitePool;

use crate::db::AppState;
use crate::models::DayOfWeek;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// App state over a fresh in-memory database
pub async fn setup_test_state() -> AppState {
  AppState::new(setup_test_db().await)
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Seed Helpers
/// ---------------------------------------------------------------------------

/// Insert a profile at the starting tier
pub async fn seed_test_profile(pool: &SqlitePool, user_id: &str, display_name: &str) {
  sqlx::query("INSERT INTO user_profiles (user_id, display_name) VALUES (?1, ?2)")
    .bind(user_id)
    .bind(display_name)
    .execute(pool)
    .await
    .expect("Failed to seed profile");
}

/// Insert one schedule entry
pub async fn seed_test_entry(pool: &SqlitePool, owner: &str, id: &str, day: DayOfWeek, completed: bool) {
  sqlx::query(
    r#"
    INSERT INTO workout_schedules (id, owner, day_of_week, workout_name, completed, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
  )
  .bind(id)
  .bind(owner)
  .bind(day)
  .bind(format!("{} workout", day.as_str()))
  .bind(completed)
  .bind(Utc::now())
  .execute(pool)
  .await
  .expect("Failed to seed schedule entry");
}

/// Seed a full Monday..Sunday week where the first `completed_days` are done.
/// Returns the entry ids in day order.
pub async fn seed_test_week(pool: &SqlitePool, owner: &str, completed_days: usize) -> Vec<String> {
  let mut ids = Vec::new();

  for (i, day) in DayOfWeek::ALL.iter().enumerate() {
    let id = format!("{}-{}", owner, day.as_str());
    seed_test_entry(pool, owner, &id, *day, i < completed_days).await;
    ids.push(id);
  }

  ids
}
