//! Runtime configuration from the environment (and `.env` via dotenvy)

use std::env;

use crate::error::AppError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://daily-grind.db?mode=rwc";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  pub database_url: String,
  pub max_connections: u32,
  pub log_filter: String,
  /// Principals granted the admin role at startup
  pub admin_principals: Vec<String>,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      max_connections: DEFAULT_MAX_CONNECTIONS,
      log_filter: DEFAULT_LOG_FILTER.to_string(),
      admin_principals: Vec::new(),
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self, AppError> {
    let max_connections = match env::var("DAILY_GRIND_MAX_CONNECTIONS") {
      Ok(raw) => raw
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
          AppError::Config(format!(
            "DAILY_GRIND_MAX_CONNECTIONS must be a positive integer, got {}",
            raw
          ))
        })?,
      Err(_) => DEFAULT_MAX_CONNECTIONS,
    };

    Ok(Self {
      database_url: env::var("DAILY_GRIND_DATABASE_URL")
        .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
      max_connections,
      log_filter: env::var("DAILY_GRIND_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
      admin_principals: env::var("DAILY_GRIND_ADMIN_PRINCIPALS")
        .map(|raw| parse_principals(&raw))
        .unwrap_or_default(),
    })
  }
}

fn parse_principals(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const VARS: [&str; 4] = [
    "DAILY_GRIND_DATABASE_URL",
    "DAILY_GRIND_MAX_CONNECTIONS",
    "DAILY_GRIND_LOG",
    "DAILY_GRIND_ADMIN_PRINCIPALS",
  ];

  #[test]
  #[serial]
  fn test_defaults_when_unset() {
    temp_env::with_vars_unset(VARS, || {
      let config = AppConfig::from_env().expect("Should load defaults");
      assert_eq!(config, AppConfig::default());
    });
  }

  #[test]
  #[serial]
  fn test_reads_all_vars() {
    temp_env::with_vars(
      [
        ("DAILY_GRIND_DATABASE_URL", Some("sqlite::memory:")),
        ("DAILY_GRIND_MAX_CONNECTIONS", Some("2")),
        ("DAILY_GRIND_LOG", Some("daily_grind_lib=debug")),
        ("DAILY_GRIND_ADMIN_PRINCIPALS", Some(" alice, ,bob ")),
      ],
      || {
        let config = AppConfig::from_env().expect("Should load");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.log_filter, "daily_grind_lib=debug");
        assert_eq!(config.admin_principals, vec!["alice", "bob"]);
      },
    );
  }

  #[test]
  #[serial]
  fn test_rejects_bad_max_connections() {
    for bad in ["zero", "0", "-3"] {
      temp_env::with_var("DAILY_GRIND_MAX_CONNECTIONS", Some(bad), || {
        let result = AppConfig::from_env();
        assert!(matches!(result, Err(AppError::Config(_))), "value {}", bad);
      });
    }
  }
}
