//! Tier Progression Engine
//!
//! Maps a week's workout completion onto a move along the tier ladder:
//! - >= 70% of the 7-day week completed: advance one tier
//! - 40% up to 70%: hold
//! - < 40%: drop one tier
//!
//! Key principles:
//! - One step per evaluation, clamped to the ladder (Dirt 1 ..= Anti-matter)
//! - A week is evaluated at most once: only weeks after `last_evaluated_week`
//!   are honored, everything else is a `same` no-op
//! - Direction reports the raw classification, so a qualifying week at
//!   Anti-matter still reads `up`
//!
//! The engine itself is pure. The database operations below persist its
//! output with a compare-and-set so two concurrent evaluations for one user
//! cannot both advance.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info, warn};

use crate::analysis::WeekCompletion;
use crate::error::AppError;
use crate::tiers::{tier_at, Tier, MAX_TIER_INDEX};

pub const DAYS_PER_WEEK: i64 = 7;
pub const ADVANCE_THRESHOLD_PCT: i64 = 70;
pub const HOLD_THRESHOLD_PCT: i64 = 40;

// ---------------------------------------------------------------------------
/// Errors: caller input that the engine refuses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ProgressionError {
    #[error("completed days must be between 0 and 7, got {0}")]
    CompletedDaysOutOfRange(i64),

    #[error("week number must not be negative, got {0}")]
    NegativeWeekNumber(i64),

    #[error("tier index must be between 0 and 21, got {0}")]
    TierIndexOutOfRange(i64),
}

// ---------------------------------------------------------------------------
/// Direction: outcome of one weekly evaluation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Same,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Same => write!(f, "same"),
        }
    }
}

// ---------------------------------------------------------------------------
/// User Tier State: the two profile fields only the engine may write
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserTierState {
    pub current_tier: usize,
    pub last_evaluated_week: i64,
}

// ---------------------------------------------------------------------------
/// Progression Result: returned to the caller, persisted by the caller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierProgressionResult {
    pub direction: Direction,
    pub previous_tier: Tier,
    pub new_tier: Tier,
}

impl TierProgressionResult {
    /// Result for a week that was not honored
    pub fn unchanged(tier: Tier) -> Self {
        Self {
            direction: Direction::Same,
            previous_tier: tier,
            new_tier: tier,
        }
    }
}

// ---------------------------------------------------------------------------
/// Tier Status: where a user stands and what this week is on track for
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierStatus {
    pub tier: Tier,
    pub next_tier: Option<Tier>,
    pub previous_tier: Option<Tier>,
    pub at_top: bool,
    pub at_bottom: bool,
    pub last_evaluated_week: i64,
    pub completion: WeekCompletion,
    pub percent_of_week: i64,
    /// Direction the week would take if evaluated now
    pub projected: Direction,
}

impl TierStatus {
    /// Read-only: nothing is evaluated or persisted
    pub fn compute(state: &UserTierState, completion: WeekCompletion) -> Result<Self, ProgressionError> {
        let tier = current_tier(state)?;

        Ok(Self {
            tier,
            next_tier: tier.next(),
            previous_tier: tier.previous(),
            at_top: tier.is_top(),
            at_bottom: tier.is_bottom(),
            last_evaluated_week: state.last_evaluated_week,
            completion,
            percent_of_week: completion.percent_of_week(),
            projected: classify_completion(completion.completed_days)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

fn validate_completed_days(completed_days: i64) -> Result<(), ProgressionError> {
    if (0..=DAYS_PER_WEEK).contains(&completed_days) {
        Ok(())
    } else {
        Err(ProgressionError::CompletedDaysOutOfRange(completed_days))
    }
}

fn validate_week_number(week_number: i64) -> Result<(), ProgressionError> {
    if week_number < 0 {
        Err(ProgressionError::NegativeWeekNumber(week_number))
    } else {
        Ok(())
    }
}

/// Classify a week against the fixed 7-day denominator.
///
/// Thresholds are compared as exact fractions (`days / 7 >= pct / 100`), so
/// the boundaries are inclusive on the higher side with no float drift.
pub fn classify_completion(completed_days: i64) -> Result<Direction, ProgressionError> {
    validate_completed_days(completed_days)?;

    let scaled = completed_days * 100;
    let direction = if scaled >= ADVANCE_THRESHOLD_PCT * DAYS_PER_WEEK {
        Direction::Up
    } else if scaled >= HOLD_THRESHOLD_PCT * DAYS_PER_WEEK {
        Direction::Same
    } else {
        Direction::Down
    };

    Ok(direction)
}

/// Move one step in `direction`, clamped to the ladder
pub fn next_tier_index(current_index: usize, direction: Direction) -> usize {
    match direction {
        Direction::Up => (current_index + 1).min(MAX_TIER_INDEX),
        Direction::Down => current_index.saturating_sub(1),
        Direction::Same => current_index,
    }
}

/// True when `week_number` has already been evaluated for this state
pub fn is_stale(state: &UserTierState, week_number: i64) -> bool {
    week_number <= state.last_evaluated_week
}

/// Evaluate one week and return the result with the state to persist.
///
/// Stale weeks return a `same` result and the input state unchanged.
/// Invalid input is rejected before the staleness check.
pub fn evaluate_and_advance(
    state: &UserTierState,
    week_number: i64,
    completed_days: i64,
) -> Result<(TierProgressionResult, UserTierState), ProgressionError> {
    validate_week_number(week_number)?;
    validate_completed_days(completed_days)?;
    let previous_tier = current_tier(state)?;

    if is_stale(state, week_number) {
        return Ok((TierProgressionResult::unchanged(previous_tier), *state));
    }

    let direction = classify_completion(completed_days)?;
    let new_tier = tier_at(next_tier_index(state.current_tier, direction))?;

    let next_state = UserTierState {
        current_tier: new_tier.index,
        last_evaluated_week: week_number,
    };

    Ok((
        TierProgressionResult {
            direction,
            previous_tier,
            new_tier,
        },
        next_state,
    ))
}

/// Read-only projection of the stored tier
pub fn current_tier(state: &UserTierState) -> Result<Tier, ProgressionError> {
    tier_at(state.current_tier)
}

// ---------------------------------------------------------------------------
// Database Operations
// ---------------------------------------------------------------------------

fn tier_index_from_db(raw: i64) -> Result<usize, ProgressionError> {
    usize::try_from(raw)
        .ok()
        .filter(|i| *i <= MAX_TIER_INDEX)
        .ok_or(ProgressionError::TierIndexOutOfRange(raw))
}

/// Load a user's tier state; users without a profile start at Dirt 1
pub async fn load_tier_state(pool: &SqlitePool, user_id: &str) -> Result<UserTierState, AppError> {
    let row = sqlx::query(
        "SELECT current_tier, last_evaluated_week FROM user_profiles WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(UserTierState {
            current_tier: tier_index_from_db(row.get("current_tier"))?,
            last_evaluated_week: row.get("last_evaluated_week"),
        }),
        None => Ok(UserTierState::default()),
    }
}

/// Evaluate a week for `user_id` against the stored state and persist it
pub async fn apply_evaluation(
    pool: &SqlitePool,
    user_id: &str,
    week_number: i64,
    completed_days: i64,
    completion: Option<&WeekCompletion>,
    evaluated_by: &str,
) -> Result<TierProgressionResult, AppError> {
    let state = load_tier_state(pool, user_id).await?;
    commit_evaluation(
        pool,
        user_id,
        &state,
        week_number,
        completed_days,
        completion,
        evaluated_by,
    )
    .await
}

/// Persist an evaluation computed from `expected`.
///
/// The write only lands if the stored state still equals `expected`. If
/// another evaluation got there first, nothing is written and the winner's
/// tier comes back as a `same` result.
pub async fn commit_evaluation(
    pool: &SqlitePool,
    user_id: &str,
    expected: &UserTierState,
    week_number: i64,
    completed_days: i64,
    completion: Option<&WeekCompletion>,
    evaluated_by: &str,
) -> Result<TierProgressionResult, AppError> {
    let (result, next) = evaluate_and_advance(expected, week_number, completed_days)?;

    if next == *expected {
        debug!(
            user = user_id,
            week = week_number,
            last_evaluated_week = expected.last_evaluated_week,
            "Week already evaluated, skipping"
        );
        return Ok(result);
    }

    let now = Utc::now().to_rfc3339();
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO user_profiles (user_id) VALUES (?) ON CONFLICT(user_id) DO NOTHING")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let updated = sqlx::query(
        r#"
        UPDATE user_profiles
        SET current_tier = ?,
            last_evaluated_week = ?,
            updated_at = ?
        WHERE user_id = ?
          AND current_tier = ?
          AND last_evaluated_week = ?
        "#,
    )
    .bind(next.current_tier as i64)
    .bind(next.last_evaluated_week)
    .bind(&now)
    .bind(user_id)
    .bind(expected.current_tier as i64)
    .bind(expected.last_evaluated_week)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        tx.rollback().await?;
        let winner = load_tier_state(pool, user_id).await?;
        warn!(
            user = user_id,
            week = week_number,
            "Tier state changed during evaluation, keeping stored state"
        );
        return Ok(TierProgressionResult::unchanged(current_tier(&winner)?));
    }

    let context_json = completion.and_then(|c| serde_json::to_string(c).ok());

    sqlx::query(
        r#"
        INSERT INTO tier_history
            (user_id, week_number, completed_days, direction, previous_tier, new_tier,
             evaluated_by, context_snapshot_json)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(week_number)
    .bind(completed_days)
    .bind(result.direction.to_string())
    .bind(result.previous_tier.index as i64)
    .bind(result.new_tier.index as i64)
    .bind(evaluated_by)
    .bind(context_json)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        user = user_id,
        week = week_number,
        completed_days,
        direction = %result.direction,
        from = result.previous_tier.name,
        to = result.new_tier.name,
        "Tier evaluated"
    );

    Ok(result)
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
