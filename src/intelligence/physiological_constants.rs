// ABOUTME: Nutrition science constants used by the goal planning calculations
// ABOUTME: Energy balance, safety clamps, calorie floors, and macro split presets
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Physiological constants for energy-balance planning
//!
//! These values are the fixed numeric policy of the engine. The tunable ones
//! seed the defaults of the configuration structs in `crate::config`; the
//! immutable ones (energy densities, scheduling presets) are read directly.

/// Energy-balance arithmetic constants
///
/// References:
/// - Mifflin, M.D., et al. (1990). A new predictive equation for resting
///   energy expenditure. *American Journal of Clinical Nutrition*, 51(2).
/// - Hall, K.D. (2008). What is the required energy deficit per unit weight loss?
///   *International Journal of Obesity*, 32(3).
pub mod energy {
    /// Mifflin-St Jeor weight coefficient (kcal per kg)
    pub const MSJ_WEIGHT_COEF: f64 = 10.0;

    /// Mifflin-St Jeor height coefficient (kcal per cm)
    pub const MSJ_HEIGHT_COEF: f64 = 6.25;

    /// Mifflin-St Jeor age coefficient (kcal per year, subtracted)
    pub const MSJ_AGE_COEF: f64 = 5.0;

    /// Mifflin-St Jeor constant for males
    pub const MSJ_MALE_CONSTANT: f64 = 5.0;

    /// Mifflin-St Jeor constant for females (also used when sex is unknown)
    pub const MSJ_FEMALE_CONSTANT: f64 = -161.0;

    /// Thermic effect of food, applied as a flat multiplier on top of the
    /// activity-adjusted expenditure
    pub const THERMIC_EFFECT_FACTOR: f64 = 1.10;

    /// Energy content of one kilogram of body mass (kcal)
    ///
    /// The classic Wishnofsky estimate; used to convert a weight-change goal
    /// into a uniform daily calorie delta.
    pub const KCAL_PER_KG_BODY_MASS: f64 = 7700.0;

    /// Energy density of carbohydrate (kcal per gram)
    pub const KCAL_PER_G_CARB: f64 = 4.0;

    /// Energy density of protein (kcal per gram)
    pub const KCAL_PER_G_PROTEIN: f64 = 4.0;

    /// Energy density of fat (kcal per gram)
    pub const KCAL_PER_G_FAT: f64 = 9.0;
}

/// Activity multipliers applied to BMR, indexed by activity level 1..4
///
/// Reference: McArdle et al. (2010) - Exercise Physiology
pub mod activity {
    /// Level 1: sedentary (little or no exercise); also the fallback for
    /// out-of-range levels
    pub const SEDENTARY: f64 = 1.20;

    /// Level 2: lightly active (1-3 days/week)
    pub const LIGHTLY_ACTIVE: f64 = 1.375;

    /// Level 3: moderately active (3-5 days/week)
    pub const MODERATELY_ACTIVE: f64 = 1.55;

    /// Level 4: very active (6-7 days/week)
    pub const VERY_ACTIVE: f64 = 1.725;
}

/// Safety clamps on the daily calorie delta
///
/// A deficit goal is floored and a surplus goal is capped; when a TDEE is
/// known, the percentage-of-TDEE bound is combined with the absolute bound
/// per direction (`max` for deficits, `min` for surpluses).
pub mod safety {
    /// Hard floor on a daily deficit (kcal/day, signed)
    pub const DEFICIT_FLOOR_KCAL: i32 = -750;

    /// Hard ceiling on a daily surplus (kcal/day, signed)
    pub const SURPLUS_CEILING_KCAL: i32 = 400;

    /// Deficit bound as a fraction of TDEE
    pub const DEFICIT_TDEE_FRACTION: f64 = 0.25;

    /// Surplus bound as a fraction of TDEE
    pub const SURPLUS_TDEE_FRACTION: f64 = 0.15;

    /// Absolute minimum daily intake for males (kcal/day)
    pub const CALORIE_FLOOR_MALE: i32 = 1500;

    /// Absolute minimum daily intake otherwise, including unknown sex (kcal/day)
    pub const CALORIE_FLOOR_DEFAULT: i32 = 1200;
}

/// Macro split presets as percentages of daily calories (carb/protein/fat)
pub mod macros {
    /// Deficit goals: higher protein to preserve lean mass
    pub const LEAN_SPLIT: (f64, f64, f64) = (40.0, 35.0, 25.0);

    /// Surplus goals: higher carbohydrate to fuel the surplus
    pub const HEALTH_SPLIT: (f64, f64, f64) = (50.0, 25.0, 25.0);
}

/// Advisory warning thresholds
pub mod warnings {
    /// Goal windows at or below this many days are checked against
    /// `AGGRESSIVE_CHANGE_KG`
    pub const SHORT_WINDOW_DAYS: i64 = 30;

    /// Absolute weight change considered too aggressive for a short window (kg)
    pub const AGGRESSIVE_CHANGE_KG: f64 = 5.0;

    /// Maximum safe weekly change as a fraction of start weight, deficit goals
    pub const MAX_WEEKLY_RATE_LEAN: f64 = 0.01;

    /// Maximum safe weekly change as a fraction of start weight, surplus goals
    pub const MAX_WEEKLY_RATE_HEALTH: f64 = 0.005;

    /// Post-clamp daily targets below this suggest professional consultation
    /// (kcal/day)
    pub const LOW_CALORIE_ADVISORY_KCAL: i32 = 1300;
}

/// Goal scheduling constants
pub mod goals {
    /// Allowed goal durations in whole weeks
    pub const DURATION_WEEKS_PRESET: [i32; 8] = [2, 4, 6, 8, 10, 12, 14, 16];

    /// Meals per day assumed when none is stored or supplied
    pub const DEFAULT_MEALS_PER_DAY: i32 = 3;
}
