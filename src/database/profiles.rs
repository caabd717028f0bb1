// ABOUTME: Read access to the external user profile collaborator table
// ABOUTME: The engine only reads profiles; the upsert exists for the owning system and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::goals::parse_uuid;
use super::Database;
use crate::errors::AppResult;
use crate::models::{Gender, UserProfile};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    /// Create the user_profiles table
    pub(super) async fn migrate_profiles(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_profiles (
                user_id TEXT PRIMARY KEY,
                age INTEGER,
                height_cm REAL,
                weight_kg REAL,
                activity_level INTEGER,
                gender TEXT NOT NULL DEFAULT 'UNSPECIFIED',
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look up the profile for a user, if one exists
    ///
    /// # Errors
    ///
    /// Returns a database error on read failure; callers in the engine treat
    /// that the same as an absent profile
    pub async fn find_profile_by_user_id(&self, user_id: Uuid) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query("SELECT * FROM user_profiles WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(profile_from_row).transpose()
    }

    /// Write a profile row; owned by the surrounding system, not this engine
    ///
    /// # Errors
    ///
    /// Returns a database error on write failure
    pub async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO user_profiles (
                user_id, age, height_cm, weight_kg, activity_level, gender, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                age = excluded.age,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                activity_level = excluded.activity_level,
                gender = excluded.gender,
                updated_at = excluded.updated_at
            ",
        )
        .bind(profile.user_id.to_string())
        .bind(profile.age)
        .bind(profile.height_cm)
        .bind(profile.weight_kg)
        .bind(profile.activity_level)
        .bind(profile.gender.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Map a user_profiles row into the domain model
fn profile_from_row(row: &SqliteRow) -> AppResult<UserProfile> {
    let user_id: String = row.try_get("user_id")?;
    let gender: String = row.try_get("gender")?;

    Ok(UserProfile {
        user_id: parse_uuid(&user_id)?,
        age: row.try_get("age")?,
        height_cm: row.try_get("height_cm")?,
        weight_kg: row.try_get("weight_kg")?,
        activity_level: row.try_get("activity_level")?,
        gender: Gender::from_str_lossy(&gender),
    })
}
