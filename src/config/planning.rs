// ABOUTME: Typed configuration for the goal planning and nutrition calculations
// ABOUTME: Defaults come from physiological constants with selective env overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Planning Configuration Module
//!
//! Provides type-safe configuration for the calorie/macro calculator and its
//! consumers. Every value defaults from
//! [`crate::intelligence::physiological_constants`]; deployments that need a
//! different safety policy override individual values through environment
//! variables before first use.
//!
//! # Configuration Methods
//!
//! 1. Environment variables (highest priority):
//!    ```bash
//!    export MACROPLAN_DEFICIT_FLOOR_KCAL=-600
//!    export MACROPLAN_SURPLUS_CEILING_KCAL=300
//!    ```
//! 2. Default values (if env vars not set)

use crate::intelligence::physiological_constants::{
    activity, energy, goals, macros, safety, warnings,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::OnceLock;
use tracing::warn;

/// BMR formula coefficients (Mifflin-St Jeor)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmrConfig {
    /// Weight coefficient (kcal per kg)
    pub msj_weight_coef: f64,
    /// Height coefficient (kcal per cm)
    pub msj_height_coef: f64,
    /// Age coefficient (kcal per year)
    pub msj_age_coef: f64,
    /// Additive constant for males
    pub msj_male_constant: f64,
    /// Additive constant for females and unknown sex
    pub msj_female_constant: f64,
    /// Thermic effect of food multiplier
    pub thermic_effect_factor: f64,
}

impl Default for BmrConfig {
    fn default() -> Self {
        Self {
            msj_weight_coef: energy::MSJ_WEIGHT_COEF,
            msj_height_coef: energy::MSJ_HEIGHT_COEF,
            msj_age_coef: energy::MSJ_AGE_COEF,
            msj_male_constant: energy::MSJ_MALE_CONSTANT,
            msj_female_constant: energy::MSJ_FEMALE_CONSTANT,
            thermic_effect_factor: energy::THERMIC_EFFECT_FACTOR,
        }
    }
}

/// Activity multipliers applied to BMR, by activity level 1..4
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityFactorsConfig {
    /// Level 1 and out-of-range fallback
    pub sedentary: f64,
    /// Level 2
    pub lightly_active: f64,
    /// Level 3
    pub moderately_active: f64,
    /// Level 4
    pub very_active: f64,
}

impl Default for ActivityFactorsConfig {
    fn default() -> Self {
        Self {
            sedentary: activity::SEDENTARY,
            lightly_active: activity::LIGHTLY_ACTIVE,
            moderately_active: activity::MODERATELY_ACTIVE,
            very_active: activity::VERY_ACTIVE,
        }
    }
}

/// Bounds applied to the raw daily calorie delta
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaClampConfig {
    /// Hard floor on deficits (kcal/day, negative)
    pub deficit_floor_kcal: i32,
    /// Hard ceiling on surpluses (kcal/day, positive)
    pub surplus_ceiling_kcal: i32,
    /// Deficit bound as fraction of TDEE
    pub deficit_tdee_fraction: f64,
    /// Surplus bound as fraction of TDEE
    pub surplus_tdee_fraction: f64,
}

impl Default for DeltaClampConfig {
    fn default() -> Self {
        Self {
            deficit_floor_kcal: safety::DEFICIT_FLOOR_KCAL,
            surplus_ceiling_kcal: safety::SURPLUS_CEILING_KCAL,
            deficit_tdee_fraction: safety::DEFICIT_TDEE_FRACTION,
            surplus_tdee_fraction: safety::SURPLUS_TDEE_FRACTION,
        }
    }
}

/// Absolute minimum daily intake per sex
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalorieFloorConfig {
    /// Minimum for males (kcal/day)
    pub male_kcal: i32,
    /// Minimum otherwise, including unknown sex (kcal/day)
    pub default_kcal: i32,
}

impl Default for CalorieFloorConfig {
    fn default() -> Self {
        Self {
            male_kcal: safety::CALORIE_FLOOR_MALE,
            default_kcal: safety::CALORIE_FLOOR_DEFAULT,
        }
    }
}

/// Macro split presets as percentages of daily calories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroSplitConfig {
    /// Deficit goals (carb/protein/fat)
    pub lean: (f64, f64, f64),
    /// Surplus goals (carb/protein/fat)
    pub health: (f64, f64, f64),
}

impl Default for MacroSplitConfig {
    fn default() -> Self {
        Self {
            lean: macros::LEAN_SPLIT,
            health: macros::HEALTH_SPLIT,
        }
    }
}

/// Advisory warning thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningThresholdsConfig {
    /// Short-window cutoff (days)
    pub short_window_days: i64,
    /// Aggressive absolute weight change for a short window (kg)
    pub aggressive_change_kg: f64,
    /// Max weekly rate relative to start weight, deficit goals
    pub max_weekly_rate_lean: f64,
    /// Max weekly rate relative to start weight, surplus goals
    pub max_weekly_rate_health: f64,
    /// Low-calorie advisory threshold (kcal/day)
    pub low_calorie_advisory_kcal: i32,
}

impl Default for WarningThresholdsConfig {
    fn default() -> Self {
        Self {
            short_window_days: warnings::SHORT_WINDOW_DAYS,
            aggressive_change_kg: warnings::AGGRESSIVE_CHANGE_KG,
            max_weekly_rate_lean: warnings::MAX_WEEKLY_RATE_LEAN,
            max_weekly_rate_health: warnings::MAX_WEEKLY_RATE_HEALTH,
            low_calorie_advisory_kcal: warnings::LOW_CALORIE_ADVISORY_KCAL,
        }
    }
}

/// Goal scheduling policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalScheduleConfig {
    /// Allowed goal durations in whole weeks
    pub duration_weeks_preset: Vec<i32>,
    /// Meals per day assumed when none is stored or supplied
    pub default_meals_per_day: i32,
}

impl Default for GoalScheduleConfig {
    fn default() -> Self {
        Self {
            duration_weeks_preset: goals::DURATION_WEEKS_PRESET.to_vec(),
            default_meals_per_day: goals::DEFAULT_MEALS_PER_DAY,
        }
    }
}

/// Main planning configuration container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// BMR formula coefficients
    pub bmr: BmrConfig,
    /// Activity multipliers
    pub activity_factors: ActivityFactorsConfig,
    /// Delta safety clamps
    pub clamp: DeltaClampConfig,
    /// Absolute intake floors
    pub floor: CalorieFloorConfig,
    /// Macro split presets
    pub macro_split: MacroSplitConfig,
    /// Warning thresholds
    pub warning_thresholds: WarningThresholdsConfig,
    /// Goal scheduling policy
    pub schedule: GoalScheduleConfig,
}

impl PlanningConfig {
    /// Get the process-wide configuration, initialized on first access
    pub fn global() -> &'static Self {
        static INSTANCE: OnceLock<PlanningConfig> = OnceLock::new();
        INSTANCE.get_or_init(Self::from_env)
    }

    /// Build configuration from defaults plus environment overrides
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(floor) = env_i32("MACROPLAN_DEFICIT_FLOOR_KCAL") {
            config.clamp.deficit_floor_kcal = floor;
        }
        if let Some(ceiling) = env_i32("MACROPLAN_SURPLUS_CEILING_KCAL") {
            config.clamp.surplus_ceiling_kcal = ceiling;
        }
        if let Some(floor) = env_i32("MACROPLAN_CALORIE_FLOOR_MALE") {
            config.floor.male_kcal = floor;
        }
        if let Some(floor) = env_i32("MACROPLAN_CALORIE_FLOOR_DEFAULT") {
            config.floor.default_kcal = floor;
        }

        config
    }
}

/// Parse an optional integer environment variable, warning on bad values
fn env_i32(name: &str) -> Option<i32> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring unparseable {name}={raw}");
            None
        }
    }
}
