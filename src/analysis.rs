//! Deterministic weekly analysis over schedule entries
//!
//! Derives the inputs the tier engine and the progress view need from a
//! user's weekly schedule. Nothing here touches the database.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{DayOfWeek, WorkoutScheduleEntry};

/// ---------------------------------------------------------------------------
/// Week Completion (engine input)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekCompletion {
  /// Distinct weekdays with at least one completed entry (0..=7)
  pub completed_days: i64,
  /// Distinct weekdays with any entry (0..=7)
  pub total_days: i64,
}

impl WeekCompletion {
  pub fn from_entries(entries: &[WorkoutScheduleEntry]) -> Self {
    let scheduled: BTreeSet<DayOfWeek> = entries.iter().map(|e| e.day_of_week).collect();
    let completed: BTreeSet<DayOfWeek> = entries
      .iter()
      .filter(|e| e.completed)
      .map(|e| e.day_of_week)
      .collect();

    Self {
      completed_days: completed.len() as i64,
      total_days: scheduled.len() as i64,
    }
  }

  /// Completion against the fixed seven-day week, rounded for display
  pub fn percent_of_week(&self) -> i64 {
    ((self.completed_days * 100) as f64 / 7.0).round() as i64
  }
}

/// ---------------------------------------------------------------------------
/// Weekly Progress (progress view)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyProgress {
  pub completed: i64,
  pub total: i64,
  pub percentage: i64,
  pub streak: i64,
  pub perfect_week: bool,
  pub completion: WeekCompletion,
}

impl WeeklyProgress {
  pub fn compute(entries: &[WorkoutScheduleEntry], today: DayOfWeek) -> Self {
    let total = entries.len() as i64;
    let completed = entries.iter().filter(|e| e.completed).count() as i64;
    let percentage = if total > 0 {
      ((completed * 100) as f64 / total as f64).round() as i64
    } else {
      0
    };

    Self {
      completed,
      total,
      percentage,
      streak: streak(entries, today),
      perfect_week: total > 0 && completed == total,
      completion: WeekCompletion::from_entries(entries),
    }
  }
}

/// Consecutive completed days walking back from `today` to Monday.
///
/// Unscheduled days are rest days: they neither count nor break the streak.
/// A scheduled day is judged by its first entry in `entries` (lowest id as
/// loaded by `schedule::load_schedules`); if that entry is not completed the
/// streak ends there.
pub fn streak(entries: &[WorkoutScheduleEntry], today: DayOfWeek) -> i64 {
  let mut streak = 0;

  for day in DayOfWeek::ALL[..=today.position()].iter().rev() {
    match entries.iter().find(|e| e.day_of_week == *day) {
      None => continue,
      Some(first) if first.completed => streak += 1,
      Some(_) => break,
    }
  }

  streak
}

/// Week of the calendar year, starting at 1 on January 1st
pub fn week_number(date: NaiveDate) -> i64 {
  (date.ordinal0() / 7) as i64 + 1
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
