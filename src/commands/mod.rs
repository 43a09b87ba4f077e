//! Service commands: one function per operation the client can invoke.
//!
//! Every command receives the shared `AppState` and the calling principal.
//! Identity comes from the transport; these functions only enforce roles and
//! ownership on top of it.

pub mod messages;
pub mod profile;
pub mod progression;
pub mod schedule;

use serde::{Deserialize, Serialize};

use crate::db::AppState;
use crate::error::AppError;
use crate::models::UserRole;

/// The principal making a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
  pub principal: String,
  pub anonymous: bool,
}

impl Caller {
  pub fn authenticated(principal: impl Into<String>) -> Self {
    Self {
      principal: principal.into(),
      anonymous: false,
    }
  }

  pub fn anonymous() -> Self {
    Self {
      principal: String::new(),
      anonymous: true,
    }
  }
}

/// Anonymous callers are guests; everyone else has a stored role or `User`
pub(crate) async fn role_of(state: &AppState, caller: &Caller) -> Result<UserRole, AppError> {
  if caller.anonymous {
    return Ok(UserRole::Guest);
  }
  crate::profile::load_role(&state.db, &caller.principal).await
}

pub(crate) async fn require_user(state: &AppState, caller: &Caller) -> Result<(), AppError> {
  match role_of(state, caller).await? {
    UserRole::Admin | UserRole::User => Ok(()),
    UserRole::Guest => Err(AppError::Unauthorized(
      "Only users can perform this action".to_string(),
    )),
  }
}

pub(crate) async fn require_admin(state: &AppState, caller: &Caller) -> Result<(), AppError> {
  match role_of(state, caller).await? {
    UserRole::Admin => Ok(()),
    _ => Err(AppError::Unauthorized(
      "Only admins can perform this action".to_string(),
    )),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_role_resolution() {
    let state = crate::test_utils::setup_test_state().await;
    crate::profile::store_role(&state.db, "root", UserRole::Admin)
      .await
      .expect("Should store");

    assert_eq!(role_of(&state, &Caller::anonymous()).await.unwrap(), UserRole::Guest);
    assert_eq!(role_of(&state, &Caller::authenticated("someone")).await.unwrap(), UserRole::User);
    assert_eq!(role_of(&state, &Caller::authenticated("root")).await.unwrap(), UserRole::Admin);

    assert!(require_user(&state, &Caller::anonymous()).await.is_err());
    assert!(require_user(&state, &Caller::authenticated("someone")).await.is_ok());
    assert!(require_admin(&state, &Caller::authenticated("someone")).await.is_err());
    assert!(require_admin(&state, &Caller::authenticated("root")).await.is_ok());

    crate::test_utils::teardown_test_db(state.db.clone()).await;
  }
}
