use serde::Serialize;

use crate::error::{PlannerError, Result};
use crate::models::lenient::finite_or_zero;
use crate::models::{CaloriePlan, Macro, MealMacros};
use crate::planner::calculations::{compute_plan, meal_share_macros, rounding_tolerance};
use crate::planner::constants::{is_valid_meal_count, round_half_up, MAX_MEALS, MIN_MEALS};

/// How `reconcile` brings the two override arrays back in line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    /// Recompute each meal's macros from its share of the daily target.
    MacrosFromCalories,
    /// Recompute each meal's calories from its macro grams.
    CaloriesFromMacros,
}

/// Aggregate of a custom distribution compared with the plan target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionTotals {
    pub target: f64,
    pub calories: f64,
    /// Custom calories minus target.
    pub deviation: f64,
    pub macros: MealMacros,
    /// Macro grams implied by the daily split.
    pub target_macros: MealMacros,
    /// Calories implied by the custom macro grams.
    pub macro_calories: f64,
    pub tolerance: f64,
}

impl DistributionTotals {
    /// Whether the custom calories match the target within rounding tolerance.
    pub fn is_balanced(&self) -> bool {
        self.deviation.abs() <= self.tolerance
    }
}

/// Change the number of meals.
///
/// A different count always discards the custom distribution. There is no
/// attempt to carry manual edits across meal counts.
pub fn set_num_meals(plan: &mut CaloriePlan, num_meals: u8) -> Result<()> {
    if !is_valid_meal_count(num_meals) {
        return Err(PlannerError::InvalidInput(format!(
            "number of meals must be between {} and {}, got {}",
            MIN_MEALS, MAX_MEALS, num_meals
        )));
    }

    if plan.num_meals == num_meals {
        return Ok(());
    }

    if plan.custom_distribution {
        tracing::info!(
            from = plan.num_meals,
            to = num_meals,
            "meal count changed, custom distribution reset"
        );
    }

    plan.num_meals = num_meals;
    plan.custom_distribution = false;
    plan.meal_calories.clear();
    plan.custom_macros.clear();
    Ok(())
}

/// Turn on custom distribution, seeding both arrays from the current even split.
///
/// Enabling an already-custom plan keeps its overrides.
pub fn enable_custom_distribution(plan: &mut CaloriePlan) {
    if plan.custom_distribution {
        return;
    }

    let breakdown = compute_plan(plan);
    plan.meal_calories = breakdown.meals.iter().map(|m| m.calories).collect();
    plan.custom_macros = breakdown.meals.iter().map(|m| m.macros).collect();
    plan.custom_distribution = true;
}

/// Turn off custom distribution and discard both override arrays.
pub fn disable_custom_distribution(plan: &mut CaloriePlan) {
    plan.custom_distribution = false;
    plan.meal_calories.clear();
    plan.custom_macros.clear();
}

fn check_meal(plan: &CaloriePlan, meal: usize) -> Result<()> {
    if !plan.custom_distribution {
        return Err(PlannerError::CustomDistributionInactive);
    }
    if let Some(reason) = plan.invariant_violation() {
        return Err(PlannerError::InvalidPlan(reason));
    }
    if meal >= plan.meal_calories.len() {
        return Err(PlannerError::MealOutOfRange {
            index: meal + 1,
            num_meals: plan.meal_calories.len(),
        });
    }
    Ok(())
}

/// Validate an edited per-meal amount. NaN and infinities count as zero;
/// negative amounts are rejected.
fn meal_amount(value: f64, what: &str) -> Result<f64> {
    let value = finite_or_zero(value);
    if value < 0.0 {
        return Err(PlannerError::InvalidInput(format!(
            "{} must not be negative, got {}",
            what, value
        )));
    }
    Ok(value)
}

/// Set one meal's calories (0-based index).
///
/// When macro overrides exist, only that meal's protein, fat and carbs are
/// rescaled to its new share of the daily target. Other meals are untouched.
pub fn set_meal_calories(plan: &mut CaloriePlan, meal: usize, calories: f64) -> Result<()> {
    check_meal(plan, meal)?;
    let calories = meal_amount(calories, "meal calories")?;

    plan.meal_calories[meal] = calories;

    if !plan.custom_macros.is_empty() {
        let breakdown = compute_plan(plan);
        plan.custom_macros[meal] =
            meal_share_macros(&breakdown.macros.grams(), calories, breakdown.target);
    }
    Ok(())
}

/// Set one macro for one meal (0-based index).
///
/// Calories of that meal and all other meals stay as they are.
pub fn set_meal_macro(plan: &mut CaloriePlan, meal: usize, which: Macro, grams: f64) -> Result<()> {
    check_meal(plan, meal)?;
    let grams = meal_amount(grams, which.name())?;

    if plan.custom_macros.is_empty() {
        plan.custom_macros = compute_plan(plan).meals.iter().map(|m| m.macros).collect();
    }
    plan.custom_macros[meal].set(which, grams);
    Ok(())
}

/// Bring meal calories and meal macros back into agreement.
pub fn reconcile(plan: &mut CaloriePlan, mode: ReconcileMode) -> Result<()> {
    check_meal(plan, 0)?;
    let breakdown = compute_plan(plan);

    match mode {
        ReconcileMode::MacrosFromCalories => {
            let daily = breakdown.macros.grams();
            plan.custom_macros = plan
                .meal_calories
                .iter()
                .map(|&kcal| meal_share_macros(&daily, kcal, breakdown.target))
                .collect();
        }
        ReconcileMode::CaloriesFromMacros => {
            plan.meal_calories = breakdown
                .meals
                .iter()
                .map(|m| round_half_up(m.macros.calories()))
                .collect();
            plan.custom_macros = breakdown.meals.iter().map(|m| m.macros).collect();
        }
    }

    tracing::info!(?mode, meals = plan.num_meals, "distribution reconciled");
    Ok(())
}

/// Totals of the current distribution against the plan target.
pub fn custom_totals(plan: &CaloriePlan) -> DistributionTotals {
    let breakdown = compute_plan(plan);
    let calories = breakdown.meal_calories_total();
    let macros = breakdown.meal_macros_total();

    DistributionTotals {
        target: breakdown.target,
        calories,
        deviation: calories - breakdown.target,
        macros,
        target_macros: breakdown.macros.grams(),
        macro_calories: macros.calories(),
        tolerance: rounding_tolerance(plan.num_meals),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_plan() -> CaloriePlan {
        let mut plan = CaloriePlan {
            weight: 80.0,
            deficit: 550,
            daily_steps: 5000,
            ..Default::default()
        };
        enable_custom_distribution(&mut plan);
        plan
    }

    #[test]
    fn test_enable_seeds_snapshot() {
        let plan = custom_plan();
        assert!(plan.custom_distribution);
        assert_eq!(plan.meal_calories, vec![525.0; 4]);
        assert_eq!(plan.custom_macros, vec![MealMacros::new(40.0, 14.0, 60.0); 4]);
    }

    #[test]
    fn test_enable_twice_keeps_edits() {
        let mut plan = custom_plan();
        set_meal_calories(&mut plan, 0, 700.0).unwrap();
        enable_custom_distribution(&mut plan);
        assert_eq!(plan.meal_calories[0], 700.0);
    }

    #[test]
    fn test_disable_clears() {
        let mut plan = custom_plan();
        disable_custom_distribution(&mut plan);
        assert!(!plan.custom_distribution);
        assert!(plan.meal_calories.is_empty());
        assert!(plan.custom_macros.is_empty());
    }

    #[test]
    fn test_set_num_meals_same_value_keeps_custom() {
        let mut plan = custom_plan();
        set_num_meals(&mut plan, 4).unwrap();
        assert!(plan.custom_distribution);
        assert_eq!(plan.meal_calories.len(), 4);
    }

    #[test]
    fn test_set_num_meals_out_of_range() {
        let mut plan = custom_plan();
        assert!(matches!(
            set_num_meals(&mut plan, 7),
            Err(PlannerError::InvalidInput(_))
        ));
        assert!(matches!(
            set_num_meals(&mut plan, 1),
            Err(PlannerError::InvalidInput(_))
        ));
        assert!(plan.custom_distribution);
    }

    #[test]
    fn test_edit_requires_custom() {
        let mut plan = CaloriePlan::default();
        assert!(matches!(
            set_meal_calories(&mut plan, 0, 500.0),
            Err(PlannerError::CustomDistributionInactive)
        ));
        assert!(matches!(
            set_meal_macro(&mut plan, 0, Macro::Fat, 10.0),
            Err(PlannerError::CustomDistributionInactive)
        ));
    }

    #[test]
    fn test_edit_out_of_range() {
        let mut plan = custom_plan();
        assert!(matches!(
            set_meal_calories(&mut plan, 4, 500.0),
            Err(PlannerError::MealOutOfRange { index: 5, num_meals: 4 })
        ));
    }

    #[test]
    fn test_negative_meal_calories_rejected() {
        let mut plan = custom_plan();
        assert!(matches!(
            set_meal_calories(&mut plan, 0, -300.0),
            Err(PlannerError::InvalidInput(_))
        ));
        assert_eq!(plan.meal_calories[0], 525.0);
        assert_eq!(plan.custom_macros[0], MealMacros::new(40.0, 14.0, 60.0));
    }

    #[test]
    fn test_negative_meal_macro_rejected() {
        let mut plan = custom_plan();
        assert!(matches!(
            set_meal_macro(&mut plan, 1, Macro::Protein, -20.0),
            Err(PlannerError::InvalidInput(_))
        ));
        assert_eq!(plan.custom_macros[1].protein, 40.0);
    }

    #[test]
    fn test_non_finite_meal_values_count_as_zero() {
        let mut plan = custom_plan();
        set_meal_calories(&mut plan, 0, f64::NAN).unwrap();
        assert_eq!(plan.meal_calories[0], 0.0);
        assert_eq!(plan.custom_macros[0], MealMacros::default());

        set_meal_macro(&mut plan, 1, Macro::Fat, f64::INFINITY).unwrap();
        assert_eq!(plan.custom_macros[1].fat, 0.0);
    }

    #[test]
    fn test_set_meal_calories_without_macros() {
        let mut plan = custom_plan();
        plan.custom_macros.clear();
        set_meal_calories(&mut plan, 1, 300.0).unwrap();
        assert_eq!(plan.meal_calories[1], 300.0);
        assert!(plan.custom_macros.is_empty());
    }

    #[test]
    fn test_set_meal_macro_seeds_missing_macros() {
        let mut plan = custom_plan();
        plan.custom_macros.clear();
        set_meal_macro(&mut plan, 2, Macro::Carbs, 90.0).unwrap();
        assert_eq!(plan.custom_macros.len(), 4);
        assert_eq!(plan.custom_macros[2].carbs, 90.0);
        assert_eq!(plan.custom_macros[0], MealMacros::new(40.0, 14.0, 60.0));
    }

    #[test]
    fn test_totals_balanced_after_enable() {
        let plan = custom_plan();
        let totals = custom_totals(&plan);
        assert_eq!(totals.calories, 2100.0);
        assert!(totals.is_balanced());
    }
}
