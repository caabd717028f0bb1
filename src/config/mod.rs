// ABOUTME: Configuration module for the planning engine
// ABOUTME: Re-exports the typed planning configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration management for the engine

pub mod planning;

pub use planning::{
    ActivityFactorsConfig, BmrConfig, CalorieFloorConfig, DeltaClampConfig, GoalScheduleConfig,
    MacroSplitConfig, PlanningConfig, WarningThresholdsConfig,
};
