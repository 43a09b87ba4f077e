pub mod message;
pub mod profile;
pub mod schedule;

pub use message::MotivationalMessage;
pub use profile::{UserProfile, UserRole};
pub use schedule::{DayOfWeek, NewWorkoutSchedule, WorkoutScheduleEntry};
