// ABOUTME: Integration tests for the plan summary provider
// ABOUTME: Covers snapshot-preferred resolution, live fallback, and advisory notices
//
// SPDX-License-Identifier: MIT OR Apache-2.0

mod common;

use chrono::NaiveDate;
use common::{create_lean_goal, create_test_database, lean_goal_input, seed_full_profile};
use macroplan::config::GoalScheduleConfig;
use macroplan::errors::ErrorCode;
use macroplan::intelligence::{GoalMetricsSnapshotter, MetricsOverrides, PlanSummaryProvider};
use macroplan::models::Gender;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn test_live_summary_without_profile_degrades_gracefully() {
    let database = create_test_database().await.unwrap();
    let user_id = Uuid::new_v4();
    let goal = create_lean_goal(&database, user_id).await.unwrap();
    let provider = PlanSummaryProvider::new(Arc::clone(&database));

    let summary = provider
        .summary(user_id, goal.id, MetricsOverrides::default())
        .await
        .unwrap();

    assert!(!summary.from_snapshot);
    assert!(!summary.profile_ready);
    assert_eq!(summary.missing_fields, vec!["profile".to_owned()]);
    assert_eq!(summary.tdee_baseline, None);
    assert_eq!(summary.target_daily_kcal, None);
    assert_eq!(summary.per_meal_kcal, None);
    assert_eq!(summary.macros_per_day.carb_g, 0);
    assert_eq!(summary.macros_per_day.protein_g, 0);
    assert_eq!(summary.macros_per_day.fat_g, 0);
    assert_eq!(summary.raw_daily_delta, -550);
    assert_eq!(summary.forecast.len(), 10);
    assert!(summary
        .warnings
        .iter()
        .any(|warning| warning.contains("No TDEE")));

    // nothing was persisted by the read
    assert!(database.get_goal_metrics(goal.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_live_summary_with_full_profile() {
    let database = create_test_database().await.unwrap();
    let user_id = Uuid::new_v4();
    let goal = create_lean_goal(&database, user_id).await.unwrap();
    seed_full_profile(&database, user_id, Gender::Male)
        .await
        .unwrap();
    let provider = PlanSummaryProvider::new(Arc::clone(&database));

    let summary = provider
        .summary(user_id, goal.id, MetricsOverrides::default())
        .await
        .unwrap();

    assert!(summary.profile_ready);
    assert!(summary.missing_fields.is_empty());
    assert_eq!(summary.tdee_baseline, Some(2494));
    assert_eq!(summary.applied_daily_delta, -550);
    assert_eq!(summary.target_daily_kcal, Some(1944));
    assert_eq!(summary.per_meal_kcal, Some(648));
    assert!((summary.macro_ratio.carb_percent - 40.0).abs() < f64::EPSILON);
    assert!(summary.macros_per_day.protein_g > 0);
}

#[tokio::test]
async fn test_live_summary_reports_specific_missing_fields() {
    let database = create_test_database().await.unwrap();
    let user_id = Uuid::new_v4();
    let goal = create_lean_goal(&database, user_id).await.unwrap();
    database
        .upsert_profile(&macroplan::models::UserProfile {
            user_id,
            age: Some(30),
            height_cm: None,
            weight_kg: Some(70.0),
            activity_level: Some(2),
            gender: Gender::Male,
        })
        .await
        .unwrap();
    let provider = PlanSummaryProvider::new(Arc::clone(&database));

    let summary = provider
        .summary(user_id, goal.id, MetricsOverrides::default())
        .await
        .unwrap();
    assert!(!summary.profile_ready);
    assert_eq!(summary.missing_fields, vec!["height".to_owned()]);
    assert_eq!(summary.tdee_baseline, None);
}

#[tokio::test]
async fn test_summary_prefers_stored_snapshot() {
    let database = create_test_database().await.unwrap();
    let user_id = Uuid::new_v4();
    let goal = create_lean_goal(&database, user_id).await.unwrap();
    let snapshotter = GoalMetricsSnapshotter::new(Arc::clone(&database));
    snapshotter
        .upsert_metrics(
            &goal,
            MetricsOverrides {
                tdee: Some(2200),
                ..MetricsOverrides::default()
            },
        )
        .await
        .unwrap();
    let provider = PlanSummaryProvider::new(Arc::clone(&database));

    // a tdee override has no effect once a snapshot exists
    let summary = provider
        .summary(
            user_id,
            goal.id,
            MetricsOverrides {
                tdee: Some(9999),
                ..MetricsOverrides::default()
            },
        )
        .await
        .unwrap();

    assert!(summary.from_snapshot);
    assert!(summary.profile_ready);
    assert_eq!(summary.tdee_baseline, Some(2200));
    assert_eq!(summary.target_daily_kcal, Some(1650));
    assert_eq!(summary.per_meal_kcal, Some(550));
}

#[tokio::test]
async fn test_snapshot_summary_meals_override_is_display_only() {
    let database = create_test_database().await.unwrap();
    let user_id = Uuid::new_v4();
    let goal = create_lean_goal(&database, user_id).await.unwrap();
    let snapshotter = GoalMetricsSnapshotter::new(Arc::clone(&database));
    snapshotter
        .upsert_metrics(
            &goal,
            MetricsOverrides {
                tdee: Some(2200),
                ..MetricsOverrides::default()
            },
        )
        .await
        .unwrap();
    let provider = PlanSummaryProvider::new(Arc::clone(&database));

    let summary = provider
        .summary(
            user_id,
            goal.id,
            MetricsOverrides {
                meals_per_day: Some(5),
                ..MetricsOverrides::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(summary.meals_per_day, 5);
    assert_eq!(summary.per_meal_kcal, Some(330));

    // the stored snapshot is untouched
    let stored = database.get_goal_metrics(goal.id).await.unwrap().unwrap();
    assert_eq!(stored.meals_per_day, 3);
    assert_eq!(stored.per_meal_kcal, Some(550));
}

#[tokio::test]
async fn test_summary_serializes_unresolved_figures_as_null() {
    let database = create_test_database().await.unwrap();
    let user_id = Uuid::new_v4();
    let goal = create_lean_goal(&database, user_id).await.unwrap();
    let provider = PlanSummaryProvider::new(Arc::clone(&database));

    let summary = provider
        .summary(user_id, goal.id, MetricsOverrides::default())
        .await
        .unwrap();
    let json = serde_json::to_value(&summary).unwrap();

    assert!(json["target_daily_kcal"].is_null());
    assert!(json["per_meal_kcal"].is_null());
    assert_eq!(json["raw_daily_delta"], -550);
    assert_eq!(json["goal_type"], "LEAN");
    assert_eq!(json["forecast"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_summary_enforces_ownership() {
    let database = create_test_database().await.unwrap();
    let goal = create_lean_goal(&database, Uuid::new_v4()).await.unwrap();
    let provider = PlanSummaryProvider::new(Arc::clone(&database));

    let error = provider
        .summary(Uuid::new_v4(), goal.id, MetricsOverrides::default())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_summary_appends_clamp_notice() {
    let database = create_test_database().await.unwrap();
    let user_id = Uuid::new_v4();
    let mut input = lean_goal_input(user_id);
    input.duration_weeks = 4;
    input.target_weight_kg = 70.0;
    input.start_date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    let goal = database
        .create_goal(input, &GoalScheduleConfig::default())
        .await
        .unwrap();
    let provider = PlanSummaryProvider::new(Arc::clone(&database));

    // 10 kg in 4 weeks: raw -2750 clamps to -550 at TDEE 2200
    let summary = provider
        .summary(
            user_id,
            goal.id,
            MetricsOverrides {
                tdee: Some(2200),
                ..MetricsOverrides::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(summary.raw_daily_delta, -2750);
    assert_eq!(summary.applied_daily_delta, -550);
    assert!(summary
        .warnings
        .iter()
        .any(|warning| warning.contains("adjusted from -2750 to -550")));
    // the short aggressive window also trips its own advisory
    assert!(summary
        .warnings
        .iter()
        .any(|warning| warning.contains("too aggressive")));
}

#[tokio::test]
async fn test_summary_appends_floor_notice() {
    let database = create_test_database().await.unwrap();
    let user_id = Uuid::new_v4();
    let goal = create_lean_goal(&database, user_id).await.unwrap();
    let provider = PlanSummaryProvider::new(Arc::clone(&database));

    // TDEE 1400: applied -350, pre-floor target 1050, floored to 1500 for males
    let summary = provider
        .summary(
            user_id,
            goal.id,
            MetricsOverrides {
                tdee: Some(1400),
                ..MetricsOverrides::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(summary.target_daily_kcal, Some(1500));
    assert!(summary
        .warnings
        .iter()
        .any(|warning| warning.contains("minimum safe level of 1500 kcal")));
}

#[tokio::test]
async fn test_low_calorie_advisory_keyed_on_preclamp_target() {
    let database = create_test_database().await.unwrap();
    let user_id = Uuid::new_v4();
    let goal = create_lean_goal(&database, user_id).await.unwrap();
    let provider = PlanSummaryProvider::new(Arc::clone(&database));

    // the post-clamp target is 1400 - 350 = 1050; the floor raises the
    // displayed value to 1500, but the advisory looks at the plan itself
    let summary = provider
        .summary(
            user_id,
            goal.id,
            MetricsOverrides {
                tdee: Some(1400),
                ..MetricsOverrides::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(summary.target_daily_kcal, Some(1500));
    assert!(summary
        .warnings
        .iter()
        .any(|warning| warning.contains("1050 kcal is very low")));
}

#[tokio::test]
async fn test_meals_override_normalized_in_summary() {
    let database = create_test_database().await.unwrap();
    let user_id = Uuid::new_v4();
    let goal = create_lean_goal(&database, user_id).await.unwrap();
    let snapshotter = GoalMetricsSnapshotter::new(Arc::clone(&database));
    snapshotter
        .upsert_metrics(
            &goal,
            MetricsOverrides {
                tdee: Some(2200),
                ..MetricsOverrides::default()
            },
        )
        .await
        .unwrap();
    let provider = PlanSummaryProvider::new(Arc::clone(&database));

    let summary = provider
        .summary(
            user_id,
            goal.id,
            MetricsOverrides {
                meals_per_day: Some(0),
                ..MetricsOverrides::default()
            },
        )
        .await
        .unwrap();

    // a degenerate meal count falls back to 3, and the reported count
    // matches the division actually performed
    assert_eq!(summary.meals_per_day, 3);
    assert_eq!(summary.per_meal_kcal, Some(550));
}
