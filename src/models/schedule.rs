use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum DayOfWeek {
  Monday,
  Tuesday,
  Wednesday,
  Thursday,
  Friday,
  Saturday,
  Sunday,
}

impl DayOfWeek {
  /// Monday-first ordering used for the weekly view
  pub const ALL: [DayOfWeek; 7] = [
    DayOfWeek::Monday,
    DayOfWeek::Tuesday,
    DayOfWeek::Wednesday,
    DayOfWeek::Thursday,
    DayOfWeek::Friday,
    DayOfWeek::Saturday,
    DayOfWeek::Sunday,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      DayOfWeek::Monday => "monday",
      DayOfWeek::Tuesday => "tuesday",
      DayOfWeek::Wednesday => "wednesday",
      DayOfWeek::Thursday => "thursday",
      DayOfWeek::Friday => "friday",
      DayOfWeek::Saturday => "saturday",
      DayOfWeek::Sunday => "sunday",
    }
  }

  /// Zero-based position, Monday = 0
  pub fn position(&self) -> usize {
    *self as usize
  }
}

impl From<Weekday> for DayOfWeek {
  fn from(day: Weekday) -> Self {
    DayOfWeek::ALL[day.num_days_from_monday() as usize]
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutScheduleEntry {
  pub id: String,
  pub owner: String,
  pub day_of_week: DayOfWeek,
  pub workout_name: String,
  pub workout_details: String,
  pub time_reminder: Option<String>,
  pub completed: bool,
  pub updated_at: Option<DateTime<Utc>>,
}

/// For creating or replacing an entry (owner comes from the caller)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkoutSchedule {
  pub day_of_week: DayOfWeek,
  pub workout_name: String,
  #[serde(default)]
  pub workout_details: String,
  pub time_reminder: Option<String>,
  #[serde(default)]
  pub completed: bool,
}
