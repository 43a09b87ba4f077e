use serde::{Deserialize, Serialize};

/// Profile as stored and as sent by the client.
///
/// The tier fields are read-only from the client's point of view: they are
/// returned on reads and ignored on saves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
  pub display_name: String,
  pub notifications_enabled: bool,
  #[serde(default)]
  pub current_tier: i64,
  #[serde(default)]
  pub last_evaluated_week: i64,
}

impl UserProfile {
  pub fn new(display_name: impl Into<String>, notifications_enabled: bool) -> Self {
    Self {
      display_name: display_name.into(),
      notifications_enabled,
      current_tier: 0,
      last_evaluated_week: 0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
  Admin,
  User,
  Guest,
}

impl std::fmt::Display for UserRole {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Admin => write!(f, "admin"),
      Self::User => write!(f, "user"),
      Self::Guest => write!(f, "guest"),
    }
  }
}
