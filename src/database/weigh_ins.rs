// ABOUTME: Weigh-in log persistence, append-only and queried by user and date range
// ABOUTME: Records are tied to the user, not a goal; goals filter by window at read time
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::goals::parse_uuid;
use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::WeighIn;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the weigh_ins table
    pub(super) async fn migrate_weigh_ins(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS weigh_ins (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                weight_kg REAL NOT NULL,
                recorded_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_weigh_ins_user_time ON weigh_ins(user_id, recorded_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append a weigh-in record for a user
    ///
    /// # Errors
    ///
    /// Returns a validation error for negative weights and a database error
    /// on write failure
    pub async fn insert_weigh_in(
        &self,
        user_id: Uuid,
        weight_kg: f64,
        recorded_at: DateTime<Utc>,
    ) -> AppResult<WeighIn> {
        if !weight_kg.is_finite() || weight_kg < 0.0 {
            return Err(AppError::out_of_range(format!(
                "weight must be non-negative, got {weight_kg}"
            )));
        }

        let record = WeighIn {
            id: Uuid::new_v4(),
            user_id,
            weight_kg,
            recorded_at,
        };

        sqlx::query(
            "INSERT INTO weigh_ins (id, user_id, weight_kg, recorded_at) VALUES (?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(record.weight_kg)
        .bind(record.recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// List a user's weigh-ins within a time window, ascending by time
    ///
    /// # Errors
    ///
    /// Returns a database error on read failure
    pub async fn list_weigh_ins_in_range(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<WeighIn>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM weigh_ins
            WHERE user_id = ? AND recorded_at >= ? AND recorded_at <= ?
            ORDER BY recorded_at ASC
            ",
        )
        .bind(user_id.to_string())
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(weigh_in_from_row).collect()
    }
}

/// Map a weigh_ins row into the domain model
fn weigh_in_from_row(row: &SqliteRow) -> AppResult<WeighIn> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;

    Ok(WeighIn {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        weight_kg: row.try_get("weight_kg")?,
        recorded_at: row.try_get("recorded_at")?,
    })
}
