//! Commands for the weekly workout schedule

use chrono::{Datelike, Utc};

use super::{require_user, Caller};
use crate::analysis::WeeklyProgress;
use crate::db::AppState;
use crate::error::AppError;
use crate::models::{DayOfWeek, NewWorkoutSchedule, WorkoutScheduleEntry};
use crate::schedule::{delete_schedule, load_schedules, set_completed, upsert_schedule};

/// All of the caller's entries, Monday first
pub async fn get_workout_schedules(
  state: &AppState,
  caller: &Caller,
) -> Result<Vec<WorkoutScheduleEntry>, AppError> {
  require_user(state, caller).await?;
  load_schedules(&state.db, &caller.principal).await
}

pub async fn create_or_update_workout_schedule(
  state: &AppState,
  caller: &Caller,
  id: &str,
  schedule: &NewWorkoutSchedule,
) -> Result<(), AppError> {
  require_user(state, caller).await?;
  upsert_schedule(&state.db, &caller.principal, id, schedule).await
}

pub async fn delete_workout_schedule(state: &AppState, caller: &Caller, id: &str) -> Result<(), AppError> {
  require_user(state, caller).await?;
  delete_schedule(&state.db, &caller.principal, id).await
}

pub async fn mark_workout_complete(
  state: &AppState,
  caller: &Caller,
  id: &str,
  completed: bool,
) -> Result<(), AppError> {
  require_user(state, caller).await?;
  set_completed(&state.db, &caller.principal, id, completed).await
}

/// Completion, rate and streak for the caller's current week
pub async fn get_weekly_progress(state: &AppState, caller: &Caller) -> Result<WeeklyProgress, AppError> {
  let today = DayOfWeek::from(Utc::now().weekday());
  get_weekly_progress_on(state, caller, today).await
}

pub async fn get_weekly_progress_on(
  state: &AppState,
  caller: &Caller,
  today: DayOfWeek,
) -> Result<WeeklyProgress, AppError> {
  require_user(state, caller).await?;
  let entries = load_schedules(&state.db, &caller.principal).await?;
  Ok(WeeklyProgress::compute(&entries, today))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn push_day(day: DayOfWeek) -> NewWorkoutSchedule {
    NewWorkoutSchedule {
      day_of_week: day,
      workout_name: "Push".to_string(),
      workout_details: String::new(),
      time_reminder: None,
      completed: false,
    }
  }

  #[tokio::test]
  async fn test_schedule_lifecycle() {
    let state = crate::test_utils::setup_test_state().await;
    let caller = Caller::authenticated("user-a");

    create_or_update_workout_schedule(&state, &caller, "mon", &push_day(DayOfWeek::Monday))
      .await
      .expect("Should create");
    create_or_update_workout_schedule(&state, &caller, "tue", &push_day(DayOfWeek::Tuesday))
      .await
      .expect("Should create");
    mark_workout_complete(&state, &caller, "mon", true)
      .await
      .expect("Should complete");

    let progress = get_weekly_progress_on(&state, &caller, DayOfWeek::Monday)
      .await
      .expect("Should compute");
    assert_eq!(progress.completed, 1);
    assert_eq!(progress.total, 2);
    assert_eq!(progress.percentage, 50);
    assert_eq!(progress.streak, 1);
    assert_eq!(progress.completion.completed_days, 1);

    delete_workout_schedule(&state, &caller, "tue").await.expect("Should delete");
    let entries = get_workout_schedules(&state, &caller).await.expect("Should list");
    assert_eq!(entries.len(), 1);
    assert!(entries[0].completed);

    crate::test_utils::teardown_test_db(state.db.clone()).await;
  }

  #[tokio::test]
  async fn test_streak_uses_lowest_id_entry_per_day() {
    let state = crate::test_utils::setup_test_state().await;
    let caller = Caller::authenticated("user-a");
    crate::test_utils::seed_test_entry(&state.db, "user-a", "mon", DayOfWeek::Monday, true).await;
    crate::test_utils::seed_test_entry(&state.db, "user-a", "tue-b", DayOfWeek::Tuesday, true).await;
    crate::test_utils::seed_test_entry(&state.db, "user-a", "tue-a", DayOfWeek::Tuesday, false).await;

    let progress = get_weekly_progress_on(&state, &caller, DayOfWeek::Tuesday)
      .await
      .expect("Should compute");

    // "tue-a" sorts first and is not done
    assert_eq!(progress.streak, 0);
    assert_eq!(progress.completion.completed_days, 2);

    crate::test_utils::teardown_test_db(state.db.clone()).await;
  }

  #[tokio::test]
  async fn test_guest_cannot_touch_schedule() {
    let state = crate::test_utils::setup_test_state().await;
    let guest = Caller::anonymous();

    assert!(matches!(
      get_workout_schedules(&state, &guest).await,
      Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
      create_or_update_workout_schedule(&state, &guest, "mon", &push_day(DayOfWeek::Monday)).await,
      Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
      get_weekly_progress(&state, &guest).await,
      Err(AppError::Unauthorized(_))
    ));

    crate::test_utils::teardown_test_db(state.db.clone()).await;
  }

  #[tokio::test]
  async fn test_cannot_complete_someone_elses_workout() {
    let state = crate::test_utils::setup_test_state().await;
    crate::test_utils::seed_test_entry(&state.db, "user-a", "mon", DayOfWeek::Monday, false).await;

    let result = mark_workout_complete(&state, &Caller::authenticated("user-b"), "mon", true).await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
    crate::test_utils::teardown_test_db(state.db.clone()).await;
  }
}
