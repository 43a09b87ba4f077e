//! Profile and role storage
//!
//! Profile saves only ever write the editable fields. `current_tier` and
//! `last_evaluated_week` belong to the tier engine and are carried forward
//! untouched whatever the incoming payload says.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::AppError;
use crate::models::{UserProfile, UserRole};

pub const MAX_DISPLAY_NAME_LEN: usize = 50;

/// Get a stored profile. Rows that only hold tier state are not profiles.
pub async fn load_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<UserProfile>, AppError> {
  let profile = sqlx::query_as::<_, UserProfile>(
    r#"
    SELECT display_name, notifications_enabled, current_tier, last_evaluated_week
    FROM user_profiles
    WHERE user_id = ? AND display_name IS NOT NULL
    "#,
  )
  .bind(user_id)
  .fetch_optional(pool)
  .await?;

  Ok(profile)
}

/// Trim and check a display name
pub fn normalize_display_name(name: &str) -> Result<String, AppError> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(AppError::Validation("Display name is required".to_string()));
  }
  if trimmed.chars().count() > MAX_DISPLAY_NAME_LEN {
    return Err(AppError::Validation(format!(
      "Display name must be at most {} characters",
      MAX_DISPLAY_NAME_LEN
    )));
  }
  Ok(trimmed.to_string())
}

/// Upsert the editable profile fields; tier fields in `profile` are ignored
pub async fn save_profile(pool: &SqlitePool, user_id: &str, profile: &UserProfile) -> Result<(), AppError> {
  let display_name = normalize_display_name(&profile.display_name)?;

  sqlx::query(
    r#"
    INSERT INTO user_profiles (user_id, display_name, notifications_enabled, updated_at)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(user_id) DO UPDATE SET
      display_name = excluded.display_name,
      notifications_enabled = excluded.notifications_enabled,
      updated_at = excluded.updated_at
    "#,
  )
  .bind(user_id)
  .bind(&display_name)
  .bind(profile.notifications_enabled)
  .bind(Utc::now().to_rfc3339())
  .execute(pool)
  .await?;

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Roles
/// ---------------------------------------------------------------------------

/// Stored role for an authenticated user, `User` when none is stored
pub async fn load_role(pool: &SqlitePool, user_id: &str) -> Result<UserRole, AppError> {
  let role: Option<UserRole> = sqlx::query_scalar("SELECT role FROM user_roles WHERE user_id = ?")
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

  Ok(role.unwrap_or(UserRole::User))
}

pub async fn store_role(pool: &SqlitePool, user_id: &str, role: UserRole) -> Result<(), AppError> {
  sqlx::query(
    r#"
    INSERT INTO user_roles (user_id, role, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(user_id) DO UPDATE SET
      role = excluded.role,
      updated_at = excluded.updated_at
    "#,
  )
  .bind(user_id)
  .bind(role)
  .bind(Utc::now().to_rfc3339())
  .execute(pool)
  .await?;

  info!(user = user_id, %role, "Role stored");
  Ok(())
}

/// Grant admin to every configured principal
pub async fn bootstrap_admins(pool: &SqlitePool, principals: &[String]) -> Result<(), AppError> {
  for principal in principals {
    store_role(pool, principal, UserRole::Admin).await?;
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
