// ABOUTME: Display-ready plan summaries with snapshot-preferred resolution
// ABOUTME: Falls back to a live, non-persisted computation when no snapshot exists
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plan summary provider
//!
//! Produces a read-only summary for a goal. When a persisted snapshot exists
//! its stored values are the source of truth and only the meals-per-day
//! figure may be overridden for display; otherwise the same resolution chain
//! as the snapshotter runs on the fly, without persisting anything.

use crate::config::PlanningConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::intelligence::calorie_calculator::{
    apply_calorie_floor, clamp_delta, collect_warnings, daily_delta, linear_forecast,
    macro_grams_per_day, macro_grams_per_meal, macro_ratio_for, normalize_meals, per_meal,
    ForecastPoint, MacroGrams, MacroRatio, WarningInputs,
};
use crate::intelligence::metrics_snapshotter::{
    resolve_sex_and_tdee, GoalMetricsSnapshotter, MetricsOverrides,
};
use crate::models::{Goal, GoalMetrics, GoalType, UserProfile};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Display-ready summary of a goal's plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Goal this summary describes
    pub goal_id: Uuid,
    /// Deficit or surplus direction
    pub goal_type: GoalType,
    /// First day of the goal window
    pub start_date: NaiveDate,
    /// Last day of the goal window, inclusive
    pub end_date: NaiveDate,
    /// Duration in whole weeks
    pub duration_weeks: i32,
    /// Body weight at the start (kg)
    pub start_weight_kg: f64,
    /// Target body weight (kg)
    pub target_weight_kg: f64,
    /// TDEE baseline used, if resolved
    pub tdee_baseline: Option<i32>,
    /// Daily delta before clamping (kcal/day)
    pub raw_daily_delta: i32,
    /// Daily delta after clamping (kcal/day)
    pub applied_daily_delta: i32,
    /// Target daily intake, null while the TDEE is unknown (kcal/day)
    pub target_daily_kcal: Option<i32>,
    /// Meals per day used for the per-meal figures
    pub meals_per_day: i32,
    /// Target intake per meal (kcal)
    pub per_meal_kcal: Option<i32>,
    /// Macro percentage split
    pub macro_ratio: MacroRatio,
    /// Macro gram targets per day (zeros while the target is unresolved)
    pub macros_per_day: MacroGrams,
    /// Macro gram targets per meal (zeros while the target is unresolved)
    pub macros_per_meal: MacroGrams,
    /// Whether the inputs for a full computation are available
    pub profile_ready: bool,
    /// Profile fields a live computation found missing
    pub missing_fields: Vec<String>,
    /// Week-by-week expected weight
    pub forecast: Vec<ForecastPoint>,
    /// Advisory strings, never errors
    pub warnings: Vec<String>,
    /// True when the figures came from a persisted snapshot
    pub from_snapshot: bool,
}

/// Produces read-only plan summaries
pub struct PlanSummaryProvider {
    database: Arc<Database>,
    snapshotter: GoalMetricsSnapshotter,
    config: PlanningConfig,
}

impl PlanSummaryProvider {
    /// Create a provider using the global planning configuration
    #[must_use]
    pub fn new(database: Arc<Database>) -> Self {
        Self::with_config(database, PlanningConfig::global().clone())
    }

    /// Create a provider with a custom configuration
    #[must_use]
    pub fn with_config(database: Arc<Database>, config: PlanningConfig) -> Self {
        Self {
            snapshotter: GoalMetricsSnapshotter::with_config(Arc::clone(&database), config.clone()),
            database,
            config,
        }
    }

    /// Build the summary for a goal, enforcing ownership
    ///
    /// # Errors
    ///
    /// `ResourceNotFound`/`PermissionDenied` from the goal lookup and
    /// database errors from the snapshot read. Profile gaps are not errors.
    pub async fn summary(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        overrides: MetricsOverrides,
    ) -> AppResult<PlanSummary> {
        let goal = self.database.get_goal(goal_id, user_id).await?;
        let stored = self.database.get_goal_metrics(goal.id).await?;

        match stored {
            Some(metrics) => Ok(self.from_stored_snapshot(&goal, &metrics, overrides)),
            None => Ok(self.from_live_inputs(&goal, overrides).await),
        }
    }

    /// Summary backed by the persisted snapshot; only the meals figure may be
    /// overridden, and the snapshot itself is never mutated
    fn from_stored_snapshot(
        &self,
        goal: &Goal,
        metrics: &GoalMetrics,
        overrides: MetricsOverrides,
    ) -> PlanSummary {
        let meals = normalize_meals(overrides.meals_per_day.unwrap_or(metrics.meals_per_day));
        let ratio = MacroRatio {
            carb_percent: metrics.ratio_carb_percent,
            protein_percent: metrics.ratio_protein_percent,
            fat_percent: metrics.ratio_fat_percent,
        };

        self.assemble(
            goal,
            SummaryFigures {
                tdee: metrics.tdee_baseline,
                raw: metrics.raw_daily_delta,
                applied: metrics.applied_daily_delta,
                target_daily: metrics.target_daily_kcal,
                meals,
                ratio,
                profile_ready: true,
                missing_fields: Vec::new(),
                from_snapshot: true,
            },
        )
    }

    /// Summary computed on the fly with the snapshotter's resolution chain;
    /// nothing is persisted
    async fn from_live_inputs(&self, goal: &Goal, overrides: MetricsOverrides) -> PlanSummary {
        let profile = self.snapshotter.lookup_profile(goal.user_id).await;
        let (sex, tdee) = resolve_sex_and_tdee(goal, overrides, profile.as_ref(), &self.config);
        let meals = normalize_meals(
            overrides
                .meals_per_day
                .or(goal.meals_per_day)
                .unwrap_or(self.config.schedule.default_meals_per_day),
        );

        let missing_fields = profile
            .as_ref()
            .map_or_else(|| vec!["profile".to_owned()], UserProfile::missing_fields);
        let profile_ready = missing_fields.is_empty();
        if !profile_ready {
            warn!(goal_id = %goal.id, ?missing_fields, "live summary with incomplete profile");
        }

        let raw = daily_delta(goal.start_weight_kg, goal.target_weight_kg, goal.duration_weeks);
        let applied = clamp_delta(goal.goal_type, raw, tdee, &self.config.clamp);
        let target_daily = tdee.map(|t| apply_calorie_floor(t + applied, sex, &self.config.floor));
        let ratio = macro_ratio_for(goal.goal_type, &self.config.macro_split);

        self.assemble(
            goal,
            SummaryFigures {
                tdee,
                raw,
                applied,
                target_daily,
                meals,
                ratio,
                profile_ready,
                missing_fields,
                from_snapshot: false,
            },
        )
    }

    /// Shared tail of both branches: per-meal figures, macro grams, forecast,
    /// and warnings
    fn assemble(&self, goal: &Goal, figures: SummaryFigures) -> PlanSummary {
        // the advisory checks look at the post-clamp target; the floor only
        // affects the displayed value
        let pre_floor_target = figures.tdee.map(|t| t + figures.applied);
        let per_meal_kcal = per_meal(figures.target_daily, figures.meals);
        let macros_per_day = figures
            .target_daily
            .map_or(MacroGrams::ZERO, |target| {
                macro_grams_per_day(target, &figures.ratio)
            });
        let macros_per_meal = if figures.target_daily.is_some() {
            macro_grams_per_meal(&macros_per_day, figures.meals)
        } else {
            MacroGrams::ZERO
        };

        let mut warnings = collect_warnings(
            &WarningInputs {
                goal_type: goal.goal_type,
                window_days: goal.window_days(),
                start_weight_kg: goal.start_weight_kg,
                target_weight_kg: goal.target_weight_kg,
                duration_weeks: goal.duration_weeks,
                tdee: figures.tdee,
                target_daily_kcal: pre_floor_target,
            },
            &self.config.warning_thresholds,
        );
        if figures.applied != figures.raw {
            warnings.push(format!(
                "Daily calorie change was adjusted from {} to {} kcal/day to stay within safe bounds",
                figures.raw, figures.applied
            ));
        }
        if let (Some(pre_floor), Some(target)) = (pre_floor_target, figures.target_daily) {
            if target > pre_floor {
                warnings.push(format!(
                    "Daily intake was raised to the minimum safe level of {target} kcal"
                ));
            }
        }

        PlanSummary {
            goal_id: goal.id,
            goal_type: goal.goal_type,
            start_date: goal.start_date,
            end_date: goal.end_date,
            duration_weeks: goal.duration_weeks,
            start_weight_kg: goal.start_weight_kg,
            target_weight_kg: goal.target_weight_kg,
            tdee_baseline: figures.tdee,
            raw_daily_delta: figures.raw,
            applied_daily_delta: figures.applied,
            target_daily_kcal: figures.target_daily,
            meals_per_day: figures.meals,
            per_meal_kcal,
            macro_ratio: figures.ratio,
            macros_per_day,
            macros_per_meal,
            profile_ready: figures.profile_ready,
            missing_fields: figures.missing_fields,
            forecast: linear_forecast(
                goal.start_weight_kg,
                goal.target_weight_kg,
                goal.duration_weeks,
            ),
            warnings,
            from_snapshot: figures.from_snapshot,
        }
    }
}

/// Resolved figures feeding the shared summary assembly
struct SummaryFigures {
    tdee: Option<i32>,
    raw: i32,
    applied: i32,
    target_daily: Option<i32>,
    meals: i32,
    ratio: MacroRatio,
    profile_ready: bool,
    missing_fields: Vec<String>,
    from_snapshot: bool,
}
