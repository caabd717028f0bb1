// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, goal, and profile seeding helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(dead_code)]

//! Shared test utilities for `macroplan` integration tests

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use macroplan::config::GoalScheduleConfig;
use macroplan::database::Database;
use macroplan::errors::AppResult;
use macroplan::models::{Gender, Goal, GoalType, NewGoal, Sex, UserProfile};
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> AppResult<Arc<Database>> {
    init_test_logging();
    Ok(Arc::new(Database::new("sqlite::memory:").await?))
}

/// First day of the reference goal window used across tests
pub fn reference_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
}

/// Input for the reference LEAN goal: 80 kg down to 75 kg over 10 weeks
pub fn lean_goal_input(user_id: Uuid) -> NewGoal {
    NewGoal {
        user_id,
        goal_type: GoalType::Lean,
        start_date: reference_start_date(),
        duration_weeks: 10,
        start_weight_kg: 80.0,
        target_weight_kg: 75.0,
        meals_per_day: Some(3),
        sex_hint: Some(Sex::Male),
    }
}

/// Create the reference LEAN goal for a fresh user
pub async fn create_lean_goal(database: &Database, user_id: Uuid) -> AppResult<Goal> {
    database
        .create_goal(lean_goal_input(user_id), &GoalScheduleConfig::default())
        .await
}

/// Seed a complete profile: male, 30 years, 175 cm, 70 kg, lightly active
pub async fn seed_full_profile(
    database: &Database,
    user_id: Uuid,
    gender: Gender,
) -> AppResult<()> {
    database
        .upsert_profile(&UserProfile {
            user_id,
            age: Some(30),
            height_cm: Some(175.0),
            weight_kg: Some(70.0),
            activity_level: Some(2),
            gender,
        })
        .await
}

/// Timestamp at 09:00 UTC, `day_offset` days after the given date
pub fn morning_of(start: NaiveDate, day_offset: i64) -> DateTime<Utc> {
    Utc.from_utc_datetime(
        &(start + Duration::days(day_offset))
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    )
}
