// ABOUTME: GoalMetrics snapshot persistence, one row per goal
// ABOUTME: Find-or-create upsert keyed on goal_id plus snapshot retrieval
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::goals::parse_uuid;
use super::Database;
use crate::errors::AppResult;
use crate::models::{GoalMetrics, Sex};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the goal_metrics table; goal_id is the natural key
    pub(super) async fn migrate_goal_metrics(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS goal_metrics (
                id TEXT PRIMARY KEY,
                goal_id TEXT NOT NULL UNIQUE REFERENCES goals(id),
                tdee_baseline INTEGER,
                sex_used TEXT,
                meals_per_day INTEGER NOT NULL,
                raw_daily_delta INTEGER NOT NULL,
                applied_daily_delta INTEGER NOT NULL,
                target_daily_kcal INTEGER,
                per_meal_kcal INTEGER,
                ratio_carb_percent REAL NOT NULL,
                ratio_protein_percent REAL NOT NULL,
                ratio_fat_percent REAL NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist a snapshot, replacing any existing row for the same goal
    ///
    /// The conflict target is the goal id, so concurrent recomputes serialize
    /// on the single row and the last writer's values persist.
    ///
    /// # Errors
    ///
    /// Returns a database error on write failure
    pub async fn upsert_goal_metrics(&self, metrics: &GoalMetrics) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO goal_metrics (
                id, goal_id, tdee_baseline, sex_used, meals_per_day,
                raw_daily_delta, applied_daily_delta, target_daily_kcal,
                per_meal_kcal, ratio_carb_percent, ratio_protein_percent,
                ratio_fat_percent, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(goal_id) DO UPDATE SET
                tdee_baseline = excluded.tdee_baseline,
                sex_used = excluded.sex_used,
                meals_per_day = excluded.meals_per_day,
                raw_daily_delta = excluded.raw_daily_delta,
                applied_daily_delta = excluded.applied_daily_delta,
                target_daily_kcal = excluded.target_daily_kcal,
                per_meal_kcal = excluded.per_meal_kcal,
                ratio_carb_percent = excluded.ratio_carb_percent,
                ratio_protein_percent = excluded.ratio_protein_percent,
                ratio_fat_percent = excluded.ratio_fat_percent,
                updated_at = excluded.updated_at
            ",
        )
        .bind(metrics.id.to_string())
        .bind(metrics.goal_id.to_string())
        .bind(metrics.tdee_baseline)
        .bind(metrics.sex_used.map(Sex::as_str))
        .bind(metrics.meals_per_day)
        .bind(metrics.raw_daily_delta)
        .bind(metrics.applied_daily_delta)
        .bind(metrics.target_daily_kcal)
        .bind(metrics.per_meal_kcal)
        .bind(metrics.ratio_carb_percent)
        .bind(metrics.ratio_protein_percent)
        .bind(metrics.ratio_fat_percent)
        .bind(metrics.created_at)
        .bind(metrics.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch the snapshot for a goal, if one has been computed
    ///
    /// # Errors
    ///
    /// Returns a database error on read failure
    pub async fn get_goal_metrics(&self, goal_id: Uuid) -> AppResult<Option<GoalMetrics>> {
        let row = sqlx::query("SELECT * FROM goal_metrics WHERE goal_id = ?")
            .bind(goal_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(metrics_from_row).transpose()
    }

    /// Count snapshot rows for a goal; used to assert the 1:1 invariant
    ///
    /// # Errors
    ///
    /// Returns a database error on read failure
    pub async fn count_goal_metrics(&self, goal_id: Uuid) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM goal_metrics WHERE goal_id = ?")
            .bind(goal_id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }
}

/// Map a goal_metrics row into the domain model
fn metrics_from_row(row: &SqliteRow) -> AppResult<GoalMetrics> {
    let id: String = row.try_get("id")?;
    let goal_id: String = row.try_get("goal_id")?;
    let sex_used: Option<String> = row.try_get("sex_used")?;

    Ok(GoalMetrics {
        id: parse_uuid(&id)?,
        goal_id: parse_uuid(&goal_id)?,
        tdee_baseline: row.try_get("tdee_baseline")?,
        sex_used: sex_used.as_deref().and_then(Sex::from_hint),
        meals_per_day: row.try_get("meals_per_day")?,
        raw_daily_delta: row.try_get("raw_daily_delta")?,
        applied_daily_delta: row.try_get("applied_daily_delta")?,
        target_daily_kcal: row.try_get("target_daily_kcal")?,
        per_meal_kcal: row.try_get("per_meal_kcal")?,
        ratio_carb_percent: row.try_get("ratio_carb_percent")?,
        ratio_protein_percent: row.try_get("ratio_protein_percent")?,
        ratio_fat_percent: row.try_get("ratio_fat_percent")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
