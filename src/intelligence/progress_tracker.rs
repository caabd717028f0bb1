// ABOUTME: Compares a goal's forecast against actually recorded weigh-ins
// ABOUTME: Window-filtered weigh-in access, week mapping, and completion percentage
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Progress tracker
//!
//! Reads the user's weigh-in log through the goal's date window and measures
//! it against the same linear forecast the summary shows. Weigh-ins are tied
//! to the user, not a goal; the window filter happens at read time.

use crate::database::Database;
use crate::errors::AppResult;
use crate::intelligence::calorie_calculator::{
    linear_forecast, round_one_decimal, ForecastPoint,
};
use crate::models::{Goal, WeighIn};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// An in-window weigh-in mapped onto a forecast week
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProgressPoint {
    /// Week index, 1-based, aligned with the forecast
    pub week: i32,
    /// Recorded weight (kg), rounded to one decimal for display
    pub weight_kg: f64,
}

/// Forecast, actuals, and completion percentage for a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Week-by-week expected weight
    pub forecast: Vec<ForecastPoint>,
    /// In-window weigh-ins mapped to weeks, ascending by time
    pub actual: Vec<ProgressPoint>,
    /// Completion percentage in 0..=100, one decimal
    pub percent_complete: f64,
}

/// Measures recorded weights against the goal forecast
pub struct ProgressTracker {
    database: Arc<Database>,
}

impl ProgressTracker {
    /// Create a tracker over the given store
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Record a weigh-in for the goal's owner
    ///
    /// The record is tied to the user; the goal only authorizes the request
    /// and scopes later reads by its window.
    ///
    /// # Errors
    ///
    /// Ownership errors from the goal lookup, a validation error for negative
    /// weights, and database errors on write failure
    pub async fn add_weigh_in(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        weight_kg: f64,
        recorded_at: DateTime<Utc>,
    ) -> AppResult<WeighIn> {
        self.database.get_goal(goal_id, user_id).await?;
        self.database
            .insert_weigh_in(user_id, weight_kg, recorded_at)
            .await
    }

    /// List the user's weigh-ins within the goal window, ascending by time
    ///
    /// # Errors
    ///
    /// Ownership errors from the goal lookup and database errors on read
    pub async fn list_weigh_ins(&self, user_id: Uuid, goal_id: Uuid) -> AppResult<Vec<WeighIn>> {
        let goal = self.database.get_goal(goal_id, user_id).await?;
        self.in_window_records(&goal).await
    }

    /// Compare the forecast against recorded weights
    ///
    /// # Errors
    ///
    /// Ownership errors from the goal lookup and database errors on read
    pub async fn progress(&self, user_id: Uuid, goal_id: Uuid) -> AppResult<GoalProgress> {
        let goal = self.database.get_goal(goal_id, user_id).await?;
        let records = self.in_window_records(&goal).await?;

        let forecast = linear_forecast(
            goal.start_weight_kg,
            goal.target_weight_kg,
            goal.duration_weeks,
        );
        let actual = records
            .iter()
            .map(|record| ProgressPoint {
                week: week_of(&goal, record.recorded_at),
                weight_kg: round_one_decimal(record.weight_kg),
            })
            .collect();
        let percent_complete = completion_percent(&goal, records.last());

        Ok(GoalProgress {
            forecast,
            actual,
            percent_complete,
        })
    }

    async fn in_window_records(&self, goal: &Goal) -> AppResult<Vec<WeighIn>> {
        self.database
            .list_weigh_ins_in_range(goal.user_id, goal.window_start(), goal.window_end())
            .await
    }
}

/// Forecast week an in-window record belongs to: whole weeks since the start
/// date plus one, never below one
fn week_of(goal: &Goal, recorded_at: DateTime<Utc>) -> i32 {
    let days = (recorded_at.date_naive() - goal.start_date).num_days();
    ((days / 7) + 1).max(1) as i32
}

/// Completion percentage against the planned weight change
///
/// Uses the most recent in-window record, or the start weight when none
/// exist. Yields 0 whenever the planned change is not a loss (target at or
/// above start); the sign convention for gain goals is deliberately left as
/// recorded pending product confirmation.
fn completion_percent(goal: &Goal, latest: Option<&WeighIn>) -> f64 {
    let target_delta = goal.start_weight_kg - goal.target_weight_kg;
    if target_delta <= 0.0 {
        return 0.0;
    }
    let latest_weight = latest.map_or(goal.start_weight_kg, |record| record.weight_kg);
    let actual_delta = goal.start_weight_kg - latest_weight;
    round_one_decimal((actual_delta / target_delta).clamp(0.0, 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GoalScheduleConfig;
    use crate::models::{GoalType, NewGoal};
    use chrono::{NaiveDate, TimeZone};

    fn goal() -> Goal {
        Goal::new(
            NewGoal {
                user_id: Uuid::new_v4(),
                goal_type: GoalType::Lean,
                start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
                duration_weeks: 10,
                start_weight_kg: 80.0,
                target_weight_kg: 75.0,
                meals_per_day: None,
                sex_hint: None,
            },
            &GoalScheduleConfig::default(),
        )
        .unwrap()
    }

    fn weigh_in(goal: &Goal, weight_kg: f64, day_offset: i64) -> WeighIn {
        WeighIn {
            id: Uuid::new_v4(),
            user_id: goal.user_id,
            weight_kg,
            recorded_at: Utc
                .from_utc_datetime(
                    &(goal.start_date + chrono::Duration::days(day_offset))
                        .and_hms_opt(9, 0, 0)
                        .unwrap(),
                ),
        }
    }

    #[test]
    fn test_week_mapping() {
        let goal = goal();
        assert_eq!(week_of(&goal, weigh_in(&goal, 80.0, 0).recorded_at), 1);
        assert_eq!(week_of(&goal, weigh_in(&goal, 80.0, 6).recorded_at), 1);
        assert_eq!(week_of(&goal, weigh_in(&goal, 80.0, 7).recorded_at), 2);
        assert_eq!(week_of(&goal, weigh_in(&goal, 80.0, 69).recorded_at), 10);
    }

    #[test]
    fn test_completion_percent_midway() {
        let goal = goal();
        let latest = weigh_in(&goal, 77.5, 35);
        assert!((completion_percent(&goal, Some(&latest)) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completion_percent_clamped() {
        let goal = goal();
        // already past the target
        let overshoot = weigh_in(&goal, 73.0, 60);
        assert!((completion_percent(&goal, Some(&overshoot)) - 100.0).abs() < f64::EPSILON);
        // regained weight above the start
        let regression = weigh_in(&goal, 82.0, 10);
        assert!((completion_percent(&goal, Some(&regression))).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completion_percent_no_records_uses_start() {
        let goal = goal();
        assert!((completion_percent(&goal, None)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completion_percent_zero_for_gain_goal() {
        let mut gain = goal();
        gain.target_weight_kg = 85.0;
        let latest = weigh_in(&gain, 83.0, 30);
        assert!((completion_percent(&gain, Some(&latest))).abs() < f64::EPSILON);
    }
}
