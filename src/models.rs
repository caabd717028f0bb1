// ABOUTME: Core data models for goals, metric snapshots, weigh-ins, and profiles
// ABOUTME: Owns schedule derivation and input validation for goal creation and re-edits
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Data Models
//!
//! Domain entities of the planning engine. A [`Goal`] is a user's
//! weight-change objective; a [`GoalMetrics`] row is the computed snapshot
//! tied 1:1 to a goal; [`WeighIn`] records and [`UserProfile`] rows are
//! consumed from the surrounding system, never owned here.

use crate::config::GoalScheduleConfig;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Biological sex used for BMR and calorie-floor decisions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    /// Male ("M")
    #[serde(rename = "M")]
    Male,
    /// Female ("F")
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    /// Single-letter storage form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }

    /// Parse the single-letter hint; anything unrecognized is unknown
    #[must_use]
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint {
            "M" | "m" => Some(Self::Male),
            "F" | "f" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Gender as recorded on the external user profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    /// Maps to [`Sex::Male`]
    Male,
    /// Maps to [`Sex::Female`]
    Female,
    /// Does not resolve to a sex
    Unspecified,
}

impl Gender {
    /// Map the profile gender onto the sex used by the calculator
    #[must_use]
    pub const fn as_sex(self) -> Option<Sex> {
        match self {
            Self::Male => Some(Sex::Male),
            Self::Female => Some(Sex::Female),
            Self::Unspecified => None,
        }
    }

    /// Storage form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Unspecified => "UNSPECIFIED",
        }
    }

    /// Parse the storage form; unknown values degrade to `Unspecified`
    #[must_use]
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "MALE" => Self::Male,
            "FEMALE" => Self::Female,
            _ => Self::Unspecified,
        }
    }
}

/// Direction of a weight-change goal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum GoalType {
    /// Calorie deficit (weight loss)
    Lean,
    /// Calorie surplus (weight/health gain)
    Health,
}

impl GoalType {
    /// Storage form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lean => "LEAN",
            Self::Health => "HEALTH",
        }
    }

    /// Parse the storage form
    ///
    /// # Errors
    ///
    /// Returns a validation error for unknown goal types
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "LEAN" => Ok(Self::Lean),
            "HEALTH" => Ok(Self::Health),
            other => Err(AppError::validation(format!("unknown goal type: {other}"))),
        }
    }
}

/// A user's weight-change objective over a fixed window of whole weeks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Unique goal identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Deficit or surplus direction
    pub goal_type: GoalType,
    /// First day of the goal window
    pub start_date: NaiveDate,
    /// Duration in whole weeks, from the fixed preset
    pub duration_weeks: i32,
    /// Last day of the goal window, inclusive (start + 7*weeks - 1 day)
    pub end_date: NaiveDate,
    /// Body weight at the start (kg)
    pub start_weight_kg: f64,
    /// Target body weight (kg)
    pub target_weight_kg: f64,
    /// Preferred meals per day, defaults to 3 when absent
    pub meals_per_day: Option<i32>,
    /// Optional sex hint ("M"/"F") stored with the goal
    pub sex_hint: Option<Sex>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for goal creation, before schedule derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
    /// Owning user
    pub user_id: Uuid,
    /// Deficit or surplus direction
    pub goal_type: GoalType,
    /// First day of the goal window
    pub start_date: NaiveDate,
    /// Duration in whole weeks, must be in the fixed preset
    pub duration_weeks: i32,
    /// Body weight at the start (kg)
    pub start_weight_kg: f64,
    /// Target body weight (kg)
    pub target_weight_kg: f64,
    /// Preferred meals per day
    pub meals_per_day: Option<i32>,
    /// Optional sex hint
    pub sex_hint: Option<Sex>,
}

impl Goal {
    /// Build a goal from validated input, deriving the inclusive end date
    ///
    /// # Errors
    ///
    /// Returns a validation error when the duration is not in the preset or a
    /// weight is negative
    pub fn new(input: NewGoal, schedule: &GoalScheduleConfig) -> AppResult<Self> {
        validate_duration(input.duration_weeks, schedule)?;
        validate_weight(input.start_weight_kg, "start weight")?;
        validate_weight(input.target_weight_kg, "target weight")?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            goal_type: input.goal_type,
            start_date: input.start_date,
            duration_weeks: input.duration_weeks,
            end_date: derive_end_date(input.start_date, input.duration_weeks),
            start_weight_kg: input.start_weight_kg,
            target_weight_kg: input.target_weight_kg,
            meals_per_day: input.meals_per_day,
            sex_hint: input.sex_hint,
            created_at: now,
            updated_at: now,
        })
    }

    /// Re-edit the schedule, re-deriving the end date
    ///
    /// Dependent snapshots are stale after this call; the snapshotter must be
    /// re-run by the caller.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the new duration is not in the preset
    pub fn reschedule(
        &mut self,
        new_start: Option<NaiveDate>,
        new_weeks: Option<i32>,
        schedule: &GoalScheduleConfig,
    ) -> AppResult<()> {
        if let Some(weeks) = new_weeks {
            validate_duration(weeks, schedule)?;
            self.duration_weeks = weeks;
        }
        if let Some(start) = new_start {
            self.start_date = start;
        }
        self.end_date = derive_end_date(self.start_date, self.duration_weeks);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Length of the goal window in days, inclusive of both ends
    #[must_use]
    pub fn window_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// First instant of the goal window (start date at 00:00:00 UTC)
    #[must_use]
    pub fn window_start(&self) -> DateTime<Utc> {
        self.start_date
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc()
    }

    /// Last instant of the goal window (end date at 23:59:59 UTC)
    #[must_use]
    pub fn window_end(&self) -> DateTime<Utc> {
        self.end_date
            .and_hms_opt(23, 59, 59)
            .unwrap_or_default()
            .and_utc()
    }
}

/// Derive the inclusive end date: start + 7*weeks - 1 day
#[must_use]
pub fn derive_end_date(start_date: NaiveDate, duration_weeks: i32) -> NaiveDate {
    start_date + Duration::days(i64::from(duration_weeks) * 7 - 1)
}

fn validate_duration(weeks: i32, schedule: &GoalScheduleConfig) -> AppResult<()> {
    if schedule.duration_weeks_preset.contains(&weeks) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "goal duration must be one of {:?} weeks, got {weeks}",
            schedule.duration_weeks_preset
        )))
    }
}

fn validate_weight(weight_kg: f64, field: &str) -> AppResult<()> {
    if weight_kg.is_finite() && weight_kg >= 0.0 {
        Ok(())
    } else {
        Err(AppError::out_of_range(format!(
            "{field} must be non-negative, got {weight_kg}"
        )))
    }
}

/// Computed metrics snapshot, at most one per goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalMetrics {
    /// Unique snapshot identifier
    pub id: Uuid,
    /// Goal this snapshot belongs to (natural key, unique)
    pub goal_id: Uuid,
    /// TDEE baseline used, unknown until a profile or override supplies it
    pub tdee_baseline: Option<i32>,
    /// Sex used in the computation
    pub sex_used: Option<Sex>,
    /// Meals per day used
    pub meals_per_day: i32,
    /// Raw daily delta before clamping (kcal/day, signed)
    pub raw_daily_delta: i32,
    /// Daily delta after safety clamping (kcal/day, signed)
    pub applied_daily_delta: i32,
    /// Target daily intake, null while the TDEE is unknown (kcal/day)
    pub target_daily_kcal: Option<i32>,
    /// Target intake per meal (kcal)
    pub per_meal_kcal: Option<i32>,
    /// Carbohydrate share of daily calories (%)
    pub ratio_carb_percent: f64,
    /// Protein share of daily calories (%)
    pub ratio_protein_percent: f64,
    /// Fat share of daily calories (%)
    pub ratio_fat_percent: f64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last recompute timestamp
    pub updated_at: DateTime<Utc>,
}

/// A recorded body weight, consumed from the weigh-in log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeighIn {
    /// Unique record identifier
    pub id: Uuid,
    /// Recording user; records are tied to the user, not a goal
    pub user_id: Uuid,
    /// Recorded body weight (kg)
    pub weight_kg: f64,
    /// When the weight was recorded
    pub recorded_at: DateTime<Utc>,
}

/// External user profile, read-only collaborator data
///
/// Fields are optional because partial profiles exist; the engine degrades to
/// null output rather than failing when data is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Profile owner
    pub user_id: Uuid,
    /// Age in years
    pub age: Option<i32>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Body weight in kilograms
    pub weight_kg: Option<f64>,
    /// Activity level 1..4
    pub activity_level: Option<i32>,
    /// Recorded gender
    pub gender: Gender,
}

impl UserProfile {
    /// Whether the profile carries everything a TDEE estimate needs, apart
    /// from sex resolution
    #[must_use]
    pub fn has_tdee_inputs(&self) -> bool {
        self.age.is_some_and(|age| age > 0)
            && self.height_cm.is_some_and(|h| h > 0.0)
            && self.weight_kg.is_some_and(|w| w > 0.0)
            && self.activity_level.is_some_and(|level| (1..=4).contains(&level))
    }

    /// Names of the profile fields a live summary reports as missing
    #[must_use]
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if !self.age.is_some_and(|age| age > 0) {
            missing.push("age".to_owned());
        }
        if !self.height_cm.is_some_and(|h| h > 0.0) {
            missing.push("height".to_owned());
        }
        if !self.weight_kg.is_some_and(|w| w > 0.0) {
            missing.push("weight".to_owned());
        }
        if !self.activity_level.is_some_and(|level| (1..=4).contains(&level)) {
            missing.push("activity_level".to_owned());
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> GoalScheduleConfig {
        GoalScheduleConfig::default()
    }

    fn sample_goal(weeks: i32) -> AppResult<Goal> {
        Goal::new(
            NewGoal {
                user_id: Uuid::new_v4(),
                goal_type: GoalType::Lean,
                start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
                duration_weeks: weeks,
                start_weight_kg: 80.0,
                target_weight_kg: 75.0,
                meals_per_day: None,
                sex_hint: None,
            },
            &schedule(),
        )
    }

    #[test]
    fn test_end_date_is_inclusive() {
        let goal = sample_goal(10).unwrap();
        // 70 days total, so the window closes 69 days after it opens
        assert_eq!(
            goal.end_date,
            NaiveDate::from_ymd_opt(2025, 5, 11).unwrap()
        );
        assert_eq!(goal.window_days(), 70);
    }

    #[test]
    fn test_duration_outside_preset_rejected() {
        let error = sample_goal(3).unwrap_err();
        assert_eq!(error.http_status(), 400);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result = Goal::new(
            NewGoal {
                user_id: Uuid::new_v4(),
                goal_type: GoalType::Health,
                start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
                duration_weeks: 4,
                start_weight_kg: -1.0,
                target_weight_kg: 60.0,
                meals_per_day: None,
                sex_hint: None,
            },
            &schedule(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_reschedule_rederives_end_date() {
        let mut goal = sample_goal(10).unwrap();
        goal.reschedule(None, Some(4), &schedule()).unwrap();
        assert_eq!(goal.duration_weeks, 4);
        assert_eq!(
            goal.end_date,
            NaiveDate::from_ymd_opt(2025, 3, 30).unwrap()
        );

        assert!(goal.reschedule(None, Some(5), &schedule()).is_err());
    }

    #[test]
    fn test_profile_missing_fields() {
        let profile = UserProfile {
            user_id: Uuid::new_v4(),
            age: Some(30),
            height_cm: None,
            weight_kg: Some(70.0),
            activity_level: Some(9),
            gender: Gender::Unspecified,
        };
        assert!(!profile.has_tdee_inputs());
        assert_eq!(profile.missing_fields(), vec!["height", "activity_level"]);
    }

    #[test]
    fn test_sex_and_gender_mapping() {
        assert_eq!(Sex::from_hint("M"), Some(Sex::Male));
        assert_eq!(Sex::from_hint("x"), None);
        assert_eq!(Gender::Male.as_sex(), Some(Sex::Male));
        assert_eq!(Gender::Unspecified.as_sex(), None);
        assert_eq!(Gender::from_str_lossy("OTHER"), Gender::Unspecified);
    }
}
