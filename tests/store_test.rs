use std::fs;

use macro_planner_rs::models::{ActivityLevel, CaloriePlan};
use macro_planner_rs::state::{JsonFileStore, PlanSession, PlanStore};
use serde_json::Value;
use tempfile::tempdir;

#[test]
fn test_session_roundtrip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plans.json");

    let mut session = PlanSession::open(JsonFileStore::new(&path), "anna").unwrap();
    assert_eq!(session.plan(), &CaloriePlan::default());

    session.set_weight(72.0).unwrap();
    session.set_activity_level(ActivityLevel::High);
    session.set_deficit(400);
    session.set_daily_steps(8000);
    session.set_protein_per_kg(1.8).unwrap();
    session.set_num_meals(5).unwrap();
    session.set_custom_distribution(true);
    session.set_meal_calories(0, 600.0).unwrap();
    session.save().unwrap();

    let reopened = PlanSession::open(JsonFileStore::new(&path), "anna").unwrap();
    let plan = reopened.plan();
    assert_eq!(plan.weight, 72.0);
    assert_eq!(plan.activity_level, ActivityLevel::High);
    assert_eq!(plan.num_meals, 5);
    assert!(plan.custom_distribution);
    assert_eq!(plan.meal_calories.len(), 5);
    assert_eq!(plan.meal_calories[0], 600.0);
    assert_eq!(plan.custom_macros.len(), 5);
}

#[test]
fn test_stored_record_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plans.json");
    let mut store = JsonFileStore::new(&path);

    let plan = CaloriePlan {
        weight: 80.0,
        deficit: 550,
        daily_steps: 5000,
        ..Default::default()
    };
    store.save("anna", &plan).unwrap();

    let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let record = &raw["anna"];
    for key in [
        "weight",
        "activityLevel",
        "deficit",
        "dailySteps",
        "proteinPerKg",
        "numMeals",
        "customDistribution",
        "mealCalories",
        "customMacros",
    ] {
        assert!(record.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(record["activityLevel"], 30);
    assert_eq!(record["mealCalories"], serde_json::json!([]));
}

#[test]
fn test_meal_count_change_is_persisted_as_reset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plans.json");

    let mut session = PlanSession::open(JsonFileStore::new(&path), "ben").unwrap();
    session.set_weight(90.0).unwrap();
    session.set_custom_distribution(true);
    session.save().unwrap();

    session.set_num_meals(3).unwrap();
    session.save().unwrap();

    let stored = JsonFileStore::new(&path).load("ben").unwrap();
    assert_eq!(stored.num_meals, 3);
    assert!(!stored.custom_distribution);
    assert!(stored.meal_calories.is_empty());
    assert!(stored.custom_macros.is_empty());
}

#[test]
fn test_form_input_with_blank_fields_loads_as_zero() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plans.json");
    fs::write(
        &path,
        r#"{"cara": {"weight": "", "activityLevel": 25, "deficit": "abc", "dailySteps": null}}"#,
    )
    .unwrap();

    let plan = JsonFileStore::new(&path).load("cara").unwrap();
    assert_eq!(plan.weight, 0.0);
    assert_eq!(plan.deficit, 0);
    assert_eq!(plan.daily_steps, 0);
    assert_eq!(plan.activity_level, ActivityLevel::Sedentary);
    assert_eq!(plan.num_meals, 4);
}

#[test]
fn test_failed_load_leaves_session_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plans.json");

    let mut session = PlanSession::open(JsonFileStore::new(&path), "dan").unwrap();
    session.set_weight(77.0).unwrap();
    session.save().unwrap();
    session.set_weight(78.0).unwrap();

    fs::write(&path, "{ broken").unwrap();
    assert!(session.reload().is_err());
    assert_eq!(session.plan().weight, 78.0);
    assert!(session.is_dirty());
}
