//! Commands for tier progression

use tracing::info;

use super::{require_admin, require_user, Caller};
use crate::analysis::WeekCompletion;
use crate::db::AppState;
use crate::error::AppError;
use crate::progression::{apply_evaluation, current_tier, load_tier_state, TierProgressionResult, TierStatus};
use crate::schedule::load_schedules;
use crate::tiers::Tier;

/// Evaluate the caller's week from their own schedule
pub async fn evaluate_and_advance_tier(
  state: &AppState,
  caller: &Caller,
  week_number: i64,
) -> Result<TierProgressionResult, AppError> {
  require_user(state, caller).await?;

  let entries = load_schedules(&state.db, &caller.principal).await?;
  let completion = WeekCompletion::from_entries(&entries);

  apply_evaluation(
    &state.db,
    &caller.principal,
    week_number,
    completion.completed_days,
    Some(&completion),
    &caller.principal,
  )
  .await
}

/// Evaluate another user's week with a supplied completion count (admin only)
pub async fn evaluate_user_tier_progression(
  state: &AppState,
  caller: &Caller,
  target: &str,
  week_number: i64,
  completed_days: i64,
) -> Result<TierProgressionResult, AppError> {
  require_admin(state, caller).await?;

  if target.trim().is_empty() {
    return Err(AppError::Validation("Target user is required".to_string()));
  }

  info!(
    admin = %caller.principal,
    target_user = target,
    week = week_number,
    completed_days,
    "Administrative tier evaluation"
  );

  apply_evaluation(
    &state.db,
    target,
    week_number,
    completed_days,
    None,
    &caller.principal,
  )
  .await
}

/// The caller's current tier
pub async fn get_user_tier(state: &AppState, caller: &Caller) -> Result<Tier, AppError> {
  require_user(state, caller).await?;

  let tier_state = load_tier_state(&state.db, &caller.principal).await?;
  Ok(current_tier(&tier_state)?)
}

/// The caller's tier, its neighbors and where this week is heading
pub async fn get_tier_status(state: &AppState, caller: &Caller) -> Result<TierStatus, AppError> {
  require_user(state, caller).await?;

  let tier_state = load_tier_state(&state.db, &caller.principal).await?;
  let entries = load_schedules(&state.db, &caller.principal).await?;

  Ok(TierStatus::compute(&tier_state, WeekCompletion::from_entries(&entries))?)
}
