// ABOUTME: Computes and durably upserts the GoalMetrics snapshot for a goal
// ABOUTME: Resolves sex/TDEE/meals through the override > goal > profile fallback chain
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Goal metrics snapshotter
//!
//! Runs the calculator against resolved inputs and writes exactly one
//! [`GoalMetrics`] row per goal. Recomputing replaces the previous snapshot
//! in place. A missing or unreadable profile never fails the operation; the
//! snapshot is written with a null TDEE instead.

use crate::config::PlanningConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::intelligence::calorie_calculator::{
    apply_calorie_floor, clamp_delta, daily_delta, estimate_tdee, macro_ratio_for,
    normalize_meals, per_meal,
};
use crate::models::{Goal, GoalMetrics, Sex, UserProfile};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Caller-supplied overrides for a metrics computation
///
/// Each field, when present, wins over the goal's stored value and the
/// profile-derived fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsOverrides {
    /// Explicit TDEE baseline (ignored unless positive)
    pub tdee: Option<i32>,
    /// Explicit sex
    pub sex: Option<Sex>,
    /// Explicit meals per day
    pub meals_per_day: Option<i32>,
}

/// Computes and persists metric snapshots
pub struct GoalMetricsSnapshotter {
    database: Arc<Database>,
    config: PlanningConfig,
}

impl GoalMetricsSnapshotter {
    /// Create a snapshotter using the global planning configuration
    #[must_use]
    pub fn new(database: Arc<Database>) -> Self {
        Self {
            database,
            config: PlanningConfig::global().clone(),
        }
    }

    /// Create a snapshotter with a custom configuration
    #[must_use]
    pub const fn with_config(database: Arc<Database>, config: PlanningConfig) -> Self {
        Self { database, config }
    }

    /// Compute the snapshot for a goal and upsert it by goal id
    ///
    /// # Errors
    ///
    /// Returns a database error when the snapshot cannot be written. Profile
    /// lookup failures are swallowed; partial data must not block snapshot
    /// creation.
    pub async fn upsert_metrics(
        &self,
        goal: &Goal,
        overrides: MetricsOverrides,
    ) -> AppResult<GoalMetrics> {
        let profile = self.lookup_profile(goal.user_id).await;
        let (sex, tdee) = resolve_sex_and_tdee(goal, overrides, profile.as_ref(), &self.config);
        let meals = normalize_meals(
            overrides
                .meals_per_day
                .or(goal.meals_per_day)
                .unwrap_or(self.config.schedule.default_meals_per_day),
        );

        let raw = daily_delta(goal.start_weight_kg, goal.target_weight_kg, goal.duration_weeks);
        let applied = clamp_delta(goal.goal_type, raw, tdee, &self.config.clamp);
        let target_daily = tdee.map(|t| apply_calorie_floor(t + applied, sex, &self.config.floor));
        let per_meal_kcal = per_meal(target_daily, meals);
        let ratio = macro_ratio_for(goal.goal_type, &self.config.macro_split);

        let now = Utc::now();
        let existing = self.database.get_goal_metrics(goal.id).await?;
        let metrics = GoalMetrics {
            id: existing.as_ref().map_or_else(Uuid::new_v4, |m| m.id),
            goal_id: goal.id,
            tdee_baseline: tdee,
            sex_used: sex,
            meals_per_day: meals,
            raw_daily_delta: raw,
            applied_daily_delta: applied,
            target_daily_kcal: target_daily,
            per_meal_kcal,
            ratio_carb_percent: ratio.carb_percent,
            ratio_protein_percent: ratio.protein_percent,
            ratio_fat_percent: ratio.fat_percent,
            created_at: existing.as_ref().map_or(now, |m| m.created_at),
            updated_at: now,
        };

        self.database.upsert_goal_metrics(&metrics).await?;
        debug!(
            goal_id = %goal.id,
            tdee = ?tdee,
            applied_delta = applied,
            "goal metrics snapshot written"
        );
        Ok(metrics)
    }

    /// Fetch the profile, degrading lookup failures to "absent"
    pub(crate) async fn lookup_profile(&self, user_id: Uuid) -> Option<UserProfile> {
        match self.database.find_profile_by_user_id(user_id).await {
            Ok(profile) => profile,
            Err(error) => {
                warn!(%user_id, %error, "profile lookup failed; continuing without profile");
                None
            }
        }
    }
}

/// Resolve sex and TDEE through the override > goal > profile fallback chain
///
/// Sex: explicit override, else the goal's stored hint, else the profile
/// gender mapping. TDEE: positive override, else a Mifflin-St Jeor estimate
/// when the profile carries age, height, weight, a valid activity level, and
/// the sex resolved; otherwise unknown.
pub(crate) fn resolve_sex_and_tdee(
    goal: &Goal,
    overrides: MetricsOverrides,
    profile: Option<&UserProfile>,
    config: &PlanningConfig,
) -> (Option<Sex>, Option<i32>) {
    let sex = overrides
        .sex
        .or(goal.sex_hint)
        .or_else(|| profile.and_then(|p| p.gender.as_sex()));

    let tdee = overrides.tdee.filter(|t| *t > 0).or_else(|| {
        let profile = profile?;
        let sex = sex?;
        if !profile.has_tdee_inputs() {
            return None;
        }
        match (
            profile.age,
            profile.height_cm,
            profile.weight_kg,
            profile.activity_level,
        ) {
            (Some(age), Some(height_cm), Some(weight_kg), Some(level)) => Some(estimate_tdee(
                sex,
                age,
                height_cm,
                weight_kg,
                level,
                &config.bmr,
                &config.activity_factors,
            )),
            _ => None,
        }
    });

    (sex, tdee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, GoalType, NewGoal};
    use chrono::NaiveDate;

    fn goal_with_hint(sex_hint: Option<Sex>) -> Goal {
        Goal::new(
            NewGoal {
                user_id: Uuid::new_v4(),
                goal_type: GoalType::Lean,
                start_date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
                duration_weeks: 10,
                start_weight_kg: 80.0,
                target_weight_kg: 75.0,
                meals_per_day: None,
                sex_hint,
            },
            &crate::config::GoalScheduleConfig::default(),
        )
        .unwrap()
    }

    fn full_profile(user_id: Uuid, gender: Gender) -> UserProfile {
        UserProfile {
            user_id,
            age: Some(30),
            height_cm: Some(175.0),
            weight_kg: Some(70.0),
            activity_level: Some(2),
            gender,
        }
    }

    #[test]
    fn test_override_wins_over_goal_and_profile() {
        let goal = goal_with_hint(Some(Sex::Female));
        let profile = full_profile(goal.user_id, Gender::Male);
        let overrides = MetricsOverrides {
            tdee: Some(2000),
            sex: Some(Sex::Male),
            meals_per_day: None,
        };
        let (sex, tdee) = resolve_sex_and_tdee(
            &goal,
            overrides,
            Some(&profile),
            &PlanningConfig::default(),
        );
        assert_eq!(sex, Some(Sex::Male));
        assert_eq!(tdee, Some(2000));
    }

    #[test]
    fn test_non_positive_tdee_override_ignored() {
        let goal = goal_with_hint(Some(Sex::Male));
        let profile = full_profile(goal.user_id, Gender::Male);
        let overrides = MetricsOverrides {
            tdee: Some(0),
            ..MetricsOverrides::default()
        };
        let (_, tdee) = resolve_sex_and_tdee(
            &goal,
            overrides,
            Some(&profile),
            &PlanningConfig::default(),
        );
        // falls through to the profile estimate
        assert_eq!(tdee, Some(2494));
    }

    #[test]
    fn test_goal_hint_beats_profile_gender() {
        let goal = goal_with_hint(Some(Sex::Female));
        let profile = full_profile(goal.user_id, Gender::Male);
        let (sex, _) = resolve_sex_and_tdee(
            &goal,
            MetricsOverrides::default(),
            Some(&profile),
            &PlanningConfig::default(),
        );
        assert_eq!(sex, Some(Sex::Female));
    }

    #[test]
    fn test_incomplete_profile_leaves_tdee_unknown() {
        let goal = goal_with_hint(None);
        let mut profile = full_profile(goal.user_id, Gender::Female);
        profile.height_cm = None;
        let (sex, tdee) = resolve_sex_and_tdee(
            &goal,
            MetricsOverrides::default(),
            Some(&profile),
            &PlanningConfig::default(),
        );
        assert_eq!(sex, Some(Sex::Female));
        assert_eq!(tdee, None);
    }

    #[test]
    fn test_unresolvable_sex_blocks_estimate() {
        let goal = goal_with_hint(None);
        let profile = full_profile(goal.user_id, Gender::Unspecified);
        let (sex, tdee) = resolve_sex_and_tdee(
            &goal,
            MetricsOverrides::default(),
            Some(&profile),
            &PlanningConfig::default(),
        );
        assert_eq!(sex, None);
        assert_eq!(tdee, None);
    }
}
