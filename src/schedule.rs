//! Workout schedule storage
//!
//! Entries are keyed by a client-chosen id and owned by the principal that
//! created them. Only the owner may change or remove an entry.

use chrono::{NaiveTime, Utc};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{NewWorkoutSchedule, WorkoutScheduleEntry};

const SELECT_ENTRY: &str = r#"
  SELECT id, owner, day_of_week, workout_name, workout_details,
         time_reminder, completed, updated_at
  FROM workout_schedules
"#;

/// All entries owned by `owner`, Monday first
pub async fn load_schedules(pool: &SqlitePool, owner: &str) -> Result<Vec<WorkoutScheduleEntry>, AppError> {
  let mut entries = sqlx::query_as::<_, WorkoutScheduleEntry>(&format!("{} WHERE owner = ? ORDER BY id", SELECT_ENTRY))
    .bind(owner)
    .fetch_all(pool)
    .await?;

  entries.sort_by_key(|e| e.day_of_week);
  Ok(entries)
}

pub async fn load_schedule(pool: &SqlitePool, id: &str) -> Result<Option<WorkoutScheduleEntry>, AppError> {
  let entry = sqlx::query_as::<_, WorkoutScheduleEntry>(&format!("{} WHERE id = ?", SELECT_ENTRY))
    .bind(id)
    .fetch_optional(pool)
    .await?;

  Ok(entry)
}

/// Load an entry and check `owner` owns it
async fn load_owned(pool: &SqlitePool, id: &str, owner: &str) -> Result<WorkoutScheduleEntry, AppError> {
  let entry = load_schedule(pool, id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Workout schedule {}", id)))?;

  if entry.owner != owner {
    return Err(AppError::Unauthorized(
      "Only the owner can modify this workout".to_string(),
    ));
  }
  Ok(entry)
}

fn validate_entry(id: &str, entry: &NewWorkoutSchedule) -> Result<(), AppError> {
  if id.trim().is_empty() {
    return Err(AppError::Validation("Workout id is required".to_string()));
  }
  if entry.workout_name.trim().is_empty() {
    return Err(AppError::Validation("Workout name is required".to_string()));
  }
  if let Some(reminder) = &entry.time_reminder {
    NaiveTime::parse_from_str(reminder, "%H:%M")
      .map_err(|_| AppError::Validation(format!("Reminder time must be HH:MM, got {}", reminder)))?;
  }
  Ok(())
}

/// Create an entry or replace one the caller already owns.
/// The ownership check is part of the statement, so a concurrent writer
/// cannot slip in between a lookup and the write.
pub async fn upsert_schedule(
  pool: &SqlitePool,
  owner: &str,
  id: &str,
  entry: &NewWorkoutSchedule,
) -> Result<(), AppError> {
  validate_entry(id, entry)?;

  let result = sqlx::query(
    r#"
    INSERT INTO workout_schedules
      (id, owner, day_of_week, workout_name, workout_details, time_reminder, completed, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    ON CONFLICT(id) DO UPDATE SET
      day_of_week = excluded.day_of_week,
      workout_name = excluded.workout_name,
      workout_details = excluded.workout_details,
      time_reminder = excluded.time_reminder,
      completed = excluded.completed,
      updated_at = excluded.updated_at
    WHERE workout_schedules.owner = excluded.owner
    "#,
  )
  .bind(id)
  .bind(owner)
  .bind(entry.day_of_week)
  .bind(entry.workout_name.trim())
  .bind(&entry.workout_details)
  .bind(&entry.time_reminder)
  .bind(entry.completed)
  .bind(Utc::now())
  .execute(pool)
  .await?;

  // id exists under another owner: the conflict update was filtered out
  if result.rows_affected() == 0 {
    return Err(AppError::Unauthorized(
      "Only the owner can modify this workout".to_string(),
    ));
  }

  Ok(())
}

pub async fn delete_schedule(pool: &SqlitePool, owner: &str, id: &str) -> Result<(), AppError> {
  load_owned(pool, id, owner).await?;

  sqlx::query("DELETE FROM workout_schedules WHERE id = ?")
    .bind(id)
    .execute(pool)
    .await?;

  Ok(())
}

pub async fn set_completed(pool: &SqlitePool, owner: &str, id: &str, completed: bool) -> Result<(), AppError> {
  load_owned(pool, id, owner).await?;

  sqlx::query("UPDATE workout_schedules SET completed = ?, updated_at = ? WHERE id = ?")
    .bind(completed)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
