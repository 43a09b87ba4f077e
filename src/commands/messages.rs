//! Commands for motivational messages. Open to guests.

use crate::db::AppState;
use crate::error::AppError;
use crate::messages::{load_all_messages, load_message, next_message};
use crate::models::MotivationalMessage;

pub async fn get_all_motivational_messages(state: &AppState) -> Result<Vec<MotivationalMessage>, AppError> {
  load_all_messages(&state.db).await
}

pub async fn get_motivational_message(state: &AppState, id: i64) -> Result<MotivationalMessage, AppError> {
  load_message(&state.db, id).await
}

/// Cycles through the stored messages across all callers
pub async fn get_random_motivational_message(state: &AppState) -> Result<MotivationalMessage, AppError> {
  next_message(&state.db, &state.message_cursor).await
}
