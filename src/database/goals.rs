// ABOUTME: Goal persistence operations with ownership-checked retrieval
// ABOUTME: Create, get, list per user, and schedule re-edit for Goal rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::Database;
use crate::config::GoalScheduleConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{Goal, GoalType, NewGoal, Sex};
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the goals table
    pub(super) async fn migrate_goals(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS goals (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                goal_type TEXT NOT NULL CHECK (goal_type IN ('LEAN', 'HEALTH')),
                start_date TEXT NOT NULL,
                duration_weeks INTEGER NOT NULL,
                end_date TEXT NOT NULL,
                start_weight_kg REAL NOT NULL,
                target_weight_kg REAL NOT NULL,
                meals_per_day INTEGER,
                sex_hint TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_goals_user_id ON goals(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Validate and persist a new goal, deriving the end date
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-preset durations or negative
    /// weights, and a database error on write failure
    pub async fn create_goal(
        &self,
        input: NewGoal,
        schedule: &GoalScheduleConfig,
    ) -> AppResult<Goal> {
        let goal = Goal::new(input, schedule)?;

        sqlx::query(
            r"
            INSERT INTO goals (
                id, user_id, goal_type, start_date, duration_weeks, end_date,
                start_weight_kg, target_weight_kg, meals_per_day, sex_hint,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(goal.id.to_string())
        .bind(goal.user_id.to_string())
        .bind(goal.goal_type.as_str())
        .bind(goal.start_date)
        .bind(goal.duration_weeks)
        .bind(goal.end_date)
        .bind(goal.start_weight_kg)
        .bind(goal.target_weight_kg)
        .bind(goal.meals_per_day)
        .bind(goal.sex_hint.map(Sex::as_str))
        .bind(goal.created_at)
        .bind(goal.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(goal)
    }

    /// Fetch a goal, enforcing ownership
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` when no goal has this id, `PermissionDenied` when
    /// the goal belongs to another user
    pub async fn get_goal(&self, goal_id: Uuid, user_id: Uuid) -> AppResult<Goal> {
        let row = sqlx::query("SELECT * FROM goals WHERE id = ?")
            .bind(goal_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Err(AppError::not_found("Goal").with_resource_id(goal_id.to_string()));
        };

        let goal = goal_from_row(&row)?;
        if goal.user_id != user_id {
            return Err(AppError::forbidden("goal belongs to another user")
                .with_user_id(user_id)
                .with_resource_id(goal_id.to_string()));
        }
        Ok(goal)
    }

    /// List a user's goals, most recent start date first
    ///
    /// # Errors
    ///
    /// Returns a database error on read failure
    pub async fn list_goals_for_user(&self, user_id: Uuid) -> AppResult<Vec<Goal>> {
        let rows = sqlx::query(
            "SELECT * FROM goals WHERE user_id = ? ORDER BY start_date DESC, created_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(goal_from_row).collect()
    }

    /// Re-edit a goal's schedule, re-deriving its end date
    ///
    /// Any dependent metrics snapshot is stale afterwards; callers re-run the
    /// snapshotter.
    ///
    /// # Errors
    ///
    /// Propagates ownership errors from the lookup and validation errors for
    /// out-of-preset durations
    pub async fn update_goal_schedule(
        &self,
        goal_id: Uuid,
        user_id: Uuid,
        new_start: Option<NaiveDate>,
        new_weeks: Option<i32>,
        schedule: &GoalScheduleConfig,
    ) -> AppResult<Goal> {
        let mut goal = self.get_goal(goal_id, user_id).await?;
        goal.reschedule(new_start, new_weeks, schedule)?;

        sqlx::query(
            r"
            UPDATE goals
            SET start_date = ?, duration_weeks = ?, end_date = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(goal.start_date)
        .bind(goal.duration_weeks)
        .bind(goal.end_date)
        .bind(goal.updated_at)
        .bind(goal.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(goal)
    }
}

/// Map a goals row into the domain model
fn goal_from_row(row: &SqliteRow) -> AppResult<Goal> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let goal_type: String = row.try_get("goal_type")?;
    let sex_hint: Option<String> = row.try_get("sex_hint")?;

    Ok(Goal {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        goal_type: GoalType::parse(&goal_type)?,
        start_date: row.try_get("start_date")?,
        duration_weeks: row.try_get("duration_weeks")?,
        end_date: row.try_get("end_date")?,
        start_weight_kg: row.try_get("start_weight_kg")?,
        target_weight_kg: row.try_get("target_weight_kg")?,
        meals_per_day: row.try_get("meals_per_day")?,
        sex_hint: sex_hint.as_deref().and_then(Sex::from_hint),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(super) fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| AppError::database(format!("malformed uuid in row: {value}")).with_source(e))
}
