//! Error taxonomy shared by the stores and the command layer
//!
//! Errors are serializable so the client can branch on `type` and show
//! `message` directly.

use serde::{Deserialize, Serialize};

use crate::progression::ProgressionError;

#[derive(Debug, thiserror::Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
  #[error("Invalid input: {0}")]
  Validation(String),

  #[error("Unauthorized: {0}")]
  Unauthorized(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Database error: {0}")]
  Database(String),
}

impl From<sqlx::Error> for AppError {
  fn from(e: sqlx::Error) -> Self {
    AppError::Database(e.to_string())
  }
}

impl From<sqlx::migrate::MigrateError> for AppError {
  fn from(e: sqlx::migrate::MigrateError) -> Self {
    AppError::Database(format!("Migration failed: {}", e))
  }
}

// Engine errors are all caller-input problems
impl From<ProgressionError> for AppError {
  fn from(e: ProgressionError) -> Self {
    AppError::Validation(e.to_string())
  }
}
