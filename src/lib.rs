// ABOUTME: Main library entry point for the macroplan goal planning engine
// ABOUTME: Exposes the calculator, stores, snapshotter, summary, and progress APIs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Macroplan
//!
//! Goal planning and nutrition calculation engine for a diet/fitness tracking
//! backend. Given a user's body metrics and a weight-change goal, it derives
//! a safe, clamped daily calorie target, a macronutrient split, and a
//! week-by-week forecast, and reconciles that forecast against recorded
//! weigh-ins.
//!
//! ## Architecture
//!
//! - **Calculator**: pure, stateless numeric functions — TDEE estimation,
//!   energy-balance deltas, safety clamping, calorie floors, macro splits,
//!   and linear forecasting
//! - **Database**: `SQLite`-backed storage for goals, metric snapshots, and
//!   weigh-ins, plus read access to the external profile table
//! - **Snapshotter**: computes and upserts one metrics snapshot per goal
//! - **Summary provider**: snapshot-preferred, display-ready plan summaries
//! - **Progress tracker**: forecast-versus-actual comparison and completion
//!   percentage
//!
//! All computations are deterministic and replayable; recomputing a snapshot
//! or summary at any time yields the same values for the same inputs.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use macroplan::config::GoalScheduleConfig;
//! use macroplan::database::Database;
//! use macroplan::errors::AppResult;
//! use macroplan::models::{GoalType, NewGoal};
//! use chrono::NaiveDate;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let database = Database::new("sqlite::memory:").await?;
//!     let goal = database
//!         .create_goal(
//!             NewGoal {
//!                 user_id: Uuid::new_v4(),
//!                 goal_type: GoalType::Lean,
//!                 start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap_or_default(),
//!                 duration_weeks: 10,
//!                 start_weight_kg: 80.0,
//!                 target_weight_kg: 75.0,
//!                 meals_per_day: Some(3),
//!                 sex_hint: None,
//!             },
//!             &GoalScheduleConfig::default(),
//!         )
//!         .await?;
//!     println!("goal window: {} to {}", goal.start_date, goal.end_date);
//!     Ok(())
//! }
//! ```

/// Configuration management
pub mod config;
/// `SQLite` persistence boundary
pub mod database;
/// Unified error handling
pub mod errors;
/// Planning intelligence: calculator and engine components
pub mod intelligence;
/// Structured logging setup
pub mod logging;
/// Core data models
pub mod models;

pub use database::Database;
pub use errors::{AppError, AppResult, ErrorCode};
pub use intelligence::{
    GoalMetricsSnapshotter, GoalProgress, MetricsOverrides, PlanSummary, PlanSummaryProvider,
    ProgressTracker,
};
pub use models::{Goal, GoalMetrics, GoalType, NewGoal, Sex, UserProfile, WeighIn};
