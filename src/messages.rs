//! Motivational messages
//!
//! Messages are seeded by migration and read-only at runtime.

use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::AppError;
use crate::models::MotivationalMessage;

pub async fn load_all_messages(pool: &SqlitePool) -> Result<Vec<MotivationalMessage>, AppError> {
  let messages = sqlx::query_as::<_, MotivationalMessage>(
    "SELECT id, message FROM motivational_messages ORDER BY id",
  )
  .fetch_all(pool)
  .await?;

  Ok(messages)
}

pub async fn load_message(pool: &SqlitePool, id: i64) -> Result<MotivationalMessage, AppError> {
  sqlx::query_as::<_, MotivationalMessage>("SELECT id, message FROM motivational_messages WHERE id = ?")
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Motivational message {}", id)))
}

/// Next message in rotation; `cursor` is shared across callers
pub async fn next_message(pool: &SqlitePool, cursor: &AtomicUsize) -> Result<MotivationalMessage, AppError> {
  let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM motivational_messages ORDER BY id")
    .fetch_all(pool)
    .await?;

  if ids.is_empty() {
    return Err(AppError::NotFound("No motivational messages available".to_string()));
  }

  let slot = cursor.fetch_add(1, Ordering::Relaxed) % ids.len();
  load_message(pool, ids[slot]).await
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_seeded_messages() {
    let pool = crate::test_utils::setup_test_db().await;

    let all = load_all_messages(&pool).await.expect("Should load");
    assert_eq!(all.len(), 10);
    assert_eq!(
      all[0].message,
      "Push yourself because no one else is going to do it for you."
    );

    crate::test_utils::teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_load_message_not_found() {
    let pool = crate::test_utils::setup_test_db().await;

    let result = load_message(&pool, 999).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    crate::test_utils::teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_next_message_cycles() {
    let pool = crate::test_utils::setup_test_db().await;
    let cursor = AtomicUsize::new(0);

    let mut seen = Vec::new();
    for _ in 0..11 {
      seen.push(next_message(&pool, &cursor).await.expect("Should rotate").id);
    }

    assert_eq!(&seen[..3], &[1, 2, 3]);
    assert_eq!(seen[9], 10);
    assert_eq!(seen[10], 1, "Should wrap around");

    crate::test_utils::teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_next_message_empty_table() {
    let pool = crate::test_utils::setup_test_db().await;
    sqlx::query("DELETE FROM motivational_messages")
      .execute(&pool)
      .await
      .expect("Should clear");

    let result = next_message(&pool, &AtomicUsize::new(0)).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    crate::test_utils::teardown_test_db(pool).await;
  }
}
