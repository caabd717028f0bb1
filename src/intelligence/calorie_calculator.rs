// ABOUTME: Pure calorie and macronutrient arithmetic for weight-change goals
// ABOUTME: TDEE estimation, delta clamping, calorie floors, macro splits, and forecasts
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calorie & Macro Calculator
//!
//! Stateless numeric functions behind the planning engine. Everything here is
//! deterministic and side-effect free: the same inputs always produce the same
//! plan, so snapshots can be replayed or recomputed at any time without drift.
//!
//! Numeric policy: intermediate arithmetic stays in floating point; rounding
//! happens once, at the end, half away from zero. Calories and grams round to
//! integers, displayed weights and ratios to one decimal.
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting
//!   energy expenditure. *American Journal of Clinical Nutrition*, 51(2).
//!   <https://doi.org/10.1093/ajcn/51.2.241>
//! - Hall, K.D. (2008). What is the required energy deficit per unit weight
//!   loss? *International Journal of Obesity*, 32(3).

use crate::config::{
    ActivityFactorsConfig, BmrConfig, CalorieFloorConfig, DeltaClampConfig, MacroSplitConfig,
    WarningThresholdsConfig,
};
use crate::intelligence::physiological_constants::{energy, goals};
use crate::models::{GoalType, Sex};
use serde::{Deserialize, Serialize};

/// Macronutrient percentage split of daily calories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MacroRatio {
    /// Carbohydrate share (%)
    pub carb_percent: f64,
    /// Protein share (%)
    pub protein_percent: f64,
    /// Fat share (%)
    pub fat_percent: f64,
}

/// Macronutrient gram targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroGrams {
    /// Carbohydrate (g)
    pub carb_g: i32,
    /// Protein (g)
    pub protein_g: i32,
    /// Fat (g)
    pub fat_g: i32,
}

impl MacroGrams {
    /// All-zero placeholder used while the calorie target is unresolved
    pub const ZERO: Self = Self {
        carb_g: 0,
        protein_g: 0,
        fat_g: 0,
    };
}

/// One point of the linear weight forecast
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    /// Week index, 1-based
    pub week: i32,
    /// Expected weight at the end of that week (kg)
    pub weight_kg: f64,
}

/// Round to the nearest integer, half away from zero
#[must_use]
pub fn round_kcal(value: f64) -> i32 {
    value.round() as i32
}

/// Round to one decimal place, half away from zero
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Estimate Total Daily Energy Expenditure
///
/// Mifflin-St Jeor BMR, multiplied by the activity factor for the given level
/// (out-of-range levels fall back to sedentary), then a flat thermic-effect
/// adjustment. Rounded to the nearest kcal at the end only.
#[must_use]
pub fn estimate_tdee(
    sex: Sex,
    age_years: i32,
    height_cm: f64,
    weight_kg: f64,
    activity_level: i32,
    bmr_config: &BmrConfig,
    factors: &ActivityFactorsConfig,
) -> i32 {
    let sex_constant = match sex {
        Sex::Male => bmr_config.msj_male_constant,
        Sex::Female => bmr_config.msj_female_constant,
    };
    let bmr = bmr_config.msj_weight_coef.mul_add(
        weight_kg,
        bmr_config
            .msj_height_coef
            .mul_add(height_cm, -(bmr_config.msj_age_coef * f64::from(age_years))),
    ) + sex_constant;

    let activity_factor = match activity_level {
        2 => factors.lightly_active,
        3 => factors.moderately_active,
        4 => factors.very_active,
        _ => factors.sedentary,
    };

    round_kcal(bmr * activity_factor * bmr_config.thermic_effect_factor)
}

/// Uniform daily calorie delta required to reach the target weight
///
/// Converts the total body-mass change into kcal/day using the 7700 kcal/kg
/// equivalence. Returns 0 when the duration is not positive.
#[must_use]
pub fn daily_delta(start_kg: f64, target_kg: f64, weeks: i32) -> i32 {
    if weeks <= 0 {
        return 0;
    }
    let total_kcal = (target_kg - start_kg) * energy::KCAL_PER_KG_BODY_MASS;
    round_kcal(total_kcal / (f64::from(weeks) * 7.0))
}

/// Clamp the raw daily delta within safety bounds
///
/// Deficits are floored at the combined bound `max(absolute, -fraction*tdee)`
/// and surpluses capped at `min(absolute, fraction*tdee)`; without a TDEE only
/// the absolute bounds apply. `Lean` goals clamp toward the deficit bound,
/// `Health` goals toward the surplus bound.
#[must_use]
pub fn clamp_delta(
    goal_type: GoalType,
    raw_delta: i32,
    tdee: Option<i32>,
    clamp: &DeltaClampConfig,
) -> i32 {
    match goal_type {
        GoalType::Lean => {
            let bound = tdee.map_or(clamp.deficit_floor_kcal, |t| {
                clamp
                    .deficit_floor_kcal
                    .max(round_kcal(-clamp.deficit_tdee_fraction * f64::from(t)))
            });
            raw_delta.max(bound)
        }
        GoalType::Health => {
            let bound = tdee.map_or(clamp.surplus_ceiling_kcal, |t| {
                clamp
                    .surplus_ceiling_kcal
                    .min(round_kcal(clamp.surplus_tdee_fraction * f64::from(t)))
            });
            raw_delta.min(bound)
        }
    }
}

/// Enforce the absolute minimum daily intake for the given sex
///
/// Unknown sex uses the lower default floor.
#[must_use]
pub fn apply_calorie_floor(
    target_daily_kcal: i32,
    sex: Option<Sex>,
    floor: &CalorieFloorConfig,
) -> i32 {
    let minimum = match sex {
        Some(Sex::Male) => floor.male_kcal,
        _ => floor.default_kcal,
    };
    target_daily_kcal.max(minimum)
}

/// Divide the daily target across meals, null-propagating
///
/// Meal counts at or below zero fall back to the default of 3.
#[must_use]
pub fn per_meal(target_daily_kcal: Option<i32>, meals_per_day: i32) -> Option<i32> {
    let meals = normalize_meals(meals_per_day);
    target_daily_kcal.map(|target| round_kcal(f64::from(target) / f64::from(meals)))
}

/// Meal count with the ≤0 fallback applied
#[must_use]
pub const fn normalize_meals(meals_per_day: i32) -> i32 {
    if meals_per_day <= 0 {
        goals::DEFAULT_MEALS_PER_DAY
    } else {
        meals_per_day
    }
}

/// Fixed macro split preset for a goal type
#[must_use]
pub fn macro_ratio_for(goal_type: GoalType, split: &MacroSplitConfig) -> MacroRatio {
    let (carb, protein, fat) = match goal_type {
        GoalType::Lean => split.lean,
        GoalType::Health => split.health,
    };
    MacroRatio {
        carb_percent: carb,
        protein_percent: protein,
        fat_percent: fat,
    }
}

/// Convert the daily calorie target into gram targets per macro
///
/// Grams = kcal x share / energy density (4 kcal/g for carbohydrate and
/// protein, 9 kcal/g for fat), floored at zero, rounded once.
#[must_use]
pub fn macro_grams_per_day(target_daily_kcal: i32, ratio: &MacroRatio) -> MacroGrams {
    let grams = |percent: f64, kcal_per_g: f64| {
        let value = f64::from(target_daily_kcal) * percent / 100.0 / kcal_per_g;
        round_kcal(value.max(0.0)).max(0)
    };
    MacroGrams {
        carb_g: grams(ratio.carb_percent, energy::KCAL_PER_G_CARB),
        protein_g: grams(ratio.protein_percent, energy::KCAL_PER_G_PROTEIN),
        fat_g: grams(ratio.fat_percent, energy::KCAL_PER_G_FAT),
    }
}

/// Divide per-day gram targets across meals
#[must_use]
pub fn macro_grams_per_meal(per_day: &MacroGrams, meals_per_day: i32) -> MacroGrams {
    let meals = f64::from(normalize_meals(meals_per_day));
    let split = |grams: i32| round_kcal(f64::from(grams) / meals).max(0);
    MacroGrams {
        carb_g: split(per_day.carb_g),
        protein_g: split(per_day.protein_g),
        fat_g: split(per_day.fat_g),
    }
}

/// Inputs for advisory warning generation
#[derive(Debug, Clone, Copy)]
pub struct WarningInputs {
    /// Deficit or surplus direction
    pub goal_type: GoalType,
    /// Goal window length in days, inclusive
    pub window_days: i64,
    /// Body weight at the start (kg)
    pub start_weight_kg: f64,
    /// Target body weight (kg)
    pub target_weight_kg: f64,
    /// Goal duration in whole weeks
    pub duration_weeks: i32,
    /// Resolved TDEE, if any
    pub tdee: Option<i32>,
    /// Post-clamp daily target before the calorie floor, if any
    pub target_daily_kcal: Option<i32>,
}

/// Generate human-readable advisory strings for a plan
///
/// These are advice, never errors. Order is fixed: window/weight check,
/// weekly-rate check, missing-TDEE check, low-calorie check. Clamp and floor
/// notices are appended afterwards by the caller.
#[must_use]
pub fn collect_warnings(
    inputs: &WarningInputs,
    thresholds: &WarningThresholdsConfig,
) -> Vec<String> {
    let mut warnings = Vec::new();

    let change_kg = (inputs.target_weight_kg - inputs.start_weight_kg).abs();
    if inputs.window_days <= thresholds.short_window_days
        && change_kg >= thresholds.aggressive_change_kg
    {
        warnings.push(format!(
            "A change of {:.1} kg within {} days is too aggressive for the goal window; consider a longer duration",
            change_kg, inputs.window_days
        ));
    }

    if inputs.duration_weeks > 0 && inputs.start_weight_kg > 0.0 {
        let weekly_rate = change_kg / f64::from(inputs.duration_weeks) / inputs.start_weight_kg;
        let limit = match inputs.goal_type {
            GoalType::Lean => thresholds.max_weekly_rate_lean,
            GoalType::Health => thresholds.max_weekly_rate_health,
        };
        if weekly_rate > limit {
            warnings.push(format!(
                "Planned weekly change of {:.1}% of start weight exceeds the recommended {:.1}% for this goal type",
                weekly_rate * 100.0,
                limit * 100.0
            ));
        }
    }

    if inputs.tdee.is_none() {
        warnings.push(
            "No TDEE is available, so percentage-based safety clamping could not be applied"
                .to_owned(),
        );
    }

    if let Some(target) = inputs.target_daily_kcal {
        if target < thresholds.low_calorie_advisory_kcal {
            warnings.push(format!(
                "A daily target of {target} kcal is very low; consider consulting a nutrition professional"
            ));
        }
    }

    warnings
}

/// Linear week-by-week weight forecast
///
/// Week *w* of `weeks` expects `start + (target - start) * w / weeks`, rounded
/// to one decimal. Empty when the duration is not positive.
#[must_use]
pub fn linear_forecast(start_kg: f64, target_kg: f64, weeks: i32) -> Vec<ForecastPoint> {
    if weeks <= 0 {
        return Vec::new();
    }
    (1..=weeks)
        .map(|week| ForecastPoint {
            week,
            weight_kg: round_one_decimal(
                (target_kg - start_kg).mul_add(f64::from(week) / f64::from(weeks), start_kg),
            ),
        })
        .collect()
}
