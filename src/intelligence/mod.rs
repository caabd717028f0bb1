// ABOUTME: Goal planning and nutrition calculation engine modules
// ABOUTME: Pure calculator plus the snapshotter, summary, and progress components
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Planning Intelligence
//!
//! The computation core: a pure calorie/macro calculator and the three
//! store-facing components built on it. Everything is deterministic and
//! recomputable; only the snapshotter and the weigh-in append write.

/// Pure calorie and macronutrient arithmetic
pub mod calorie_calculator;
/// Computes and persists metric snapshots
pub mod metrics_snapshotter;
/// Nutrition science constants
pub mod physiological_constants;
/// Display-ready plan summaries
pub mod plan_summary;
/// Forecast-versus-actual progress measurement
pub mod progress_tracker;

pub use calorie_calculator::{ForecastPoint, MacroGrams, MacroRatio};
pub use metrics_snapshotter::{GoalMetricsSnapshotter, MetricsOverrides};
pub use plan_summary::{PlanSummary, PlanSummaryProvider};
pub use progress_tracker::{GoalProgress, ProgressPoint, ProgressTracker};
