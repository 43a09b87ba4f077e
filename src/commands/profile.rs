//! Commands for profiles and roles

use tracing::info;

use super::{require_admin, require_user, role_of, Caller};
use crate::db::AppState;
use crate::error::AppError;
use crate::models::{UserProfile, UserRole};
use crate::profile::{load_profile, save_profile, store_role};

pub async fn get_caller_user_profile(
  state: &AppState,
  caller: &Caller,
) -> Result<Option<UserProfile>, AppError> {
  require_user(state, caller).await?;
  load_profile(&state.db, &caller.principal).await
}

/// Callers may read their own profile; admins may read anyone's
pub async fn get_user_profile(
  state: &AppState,
  caller: &Caller,
  user: &str,
) -> Result<Option<UserProfile>, AppError> {
  if caller.anonymous || caller.principal != user {
    require_admin(state, caller).await?;
  } else {
    require_user(state, caller).await?;
  }
  load_profile(&state.db, user).await
}

/// Save display name and notification preference; tier fields are ignored
pub async fn save_caller_user_profile(
  state: &AppState,
  caller: &Caller,
  profile: &UserProfile,
) -> Result<(), AppError> {
  require_user(state, caller).await?;
  save_profile(&state.db, &caller.principal, profile).await
}

pub async fn get_caller_user_role(state: &AppState, caller: &Caller) -> Result<UserRole, AppError> {
  role_of(state, caller).await
}

pub async fn is_caller_admin(state: &AppState, caller: &Caller) -> Result<bool, AppError> {
  Ok(role_of(state, caller).await? == UserRole::Admin)
}

pub async fn assign_role(
  state: &AppState,
  caller: &Caller,
  user: &str,
  role: UserRole,
) -> Result<(), AppError> {
  require_admin(state, caller).await?;

  if user.trim().is_empty() {
    return Err(AppError::Validation("User is required".to_string()));
  }

  store_role(&state.db, user, role).await?;
  info!(admin = %caller.principal, user, %role, "Role assigned");
  Ok(())
}
