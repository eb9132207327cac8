use serde::Serialize;

use crate::models::{ActivityLevel, CaloriePlan, MealMacros};
use crate::planner::constants::*;

/// Daily macro split in grams and kcal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroSplit {
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
    pub protein_kcal: f64,
    pub fat_kcal: f64,
    pub carbs_kcal: f64,
}

impl MacroSplit {
    /// Daily grams as a `MealMacros` value.
    pub fn grams(&self) -> MealMacros {
        MealMacros::new(self.protein_g, self.fat_g, self.carbs_g)
    }
}

/// Calorie and macro target for one meal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MealTarget {
    pub calories: f64,
    pub macros: MealMacros,
}

/// Conditions the coach should see but that never block a plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// The deficit exceeds baseline plus step bonus.
    NegativeTarget { target: f64 },
    /// Protein and fat alone meet the target, carbs are clamped to zero.
    CarbsExhausted,
    /// Custom meal calories do not add up to the target.
    DistributionDrift { deviation: f64 },
}

/// Everything derived from a plan's inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanBreakdown {
    pub bmr: f64,
    pub steps_calories: f64,
    /// Baseline minus deficit.
    pub target_base: f64,
    /// Baseline minus deficit plus step bonus.
    pub target: f64,
    pub macros: MacroSplit,
    pub meals: Vec<MealTarget>,
    pub warnings: Vec<PlanWarning>,
}

impl PlanBreakdown {
    /// Sum of per-meal calories.
    pub fn meal_calories_total(&self) -> f64 {
        self.meals.iter().map(|m| m.calories).sum()
    }

    /// Sum of per-meal macro grams.
    pub fn meal_macros_total(&self) -> MealMacros {
        self.meals.iter().map(|m| m.macros).sum()
    }
}

/// Baseline expenditure: weight times the flat activity multiplier.
pub fn calculate_bmr(weight_kg: f64, activity: ActivityLevel) -> f64 {
    weight_kg * activity.multiplier()
}

/// Bonus calories for daily steps: 50 kcal per 1,000 steps, rounded.
pub fn calculate_steps_calories(daily_steps: u32) -> f64 {
    round_half_up(daily_steps as f64 / 1000.0 * KCAL_PER_1000_STEPS)
}

/// Split a calorie target into protein, fat and carbs.
///
/// Protein and fat are fixed by body weight. Carbs absorb whatever is left and
/// are clamped at zero.
pub fn calculate_macros(weight_kg: f64, protein_per_kg: f64, target: f64) -> MacroSplit {
    let protein_g = weight_kg * protein_per_kg;
    let fat_g = weight_kg * FAT_PER_KG;
    let protein_kcal = protein_g * KCAL_PER_G_PROTEIN;
    let fat_kcal = fat_g * KCAL_PER_G_FAT;
    let carbs_kcal = (target - protein_kcal - fat_kcal).max(0.0);

    MacroSplit {
        protein_g,
        fat_g,
        carbs_g: carbs_kcal / KCAL_PER_G_CARBS,
        protein_kcal,
        fat_kcal,
        carbs_kcal,
    }
}

/// Split the day evenly across `num_meals`.
///
/// Each value is rounded independently; the last meal is not adjusted for the
/// remainder. Meal calories never go below zero.
pub fn even_distribution(target: f64, daily: &MealMacros, num_meals: u8) -> Vec<MealTarget> {
    if num_meals == 0 {
        return Vec::new();
    }
    let n = num_meals as f64;

    let meal = MealTarget {
        calories: round_half_up(target / n).max(0.0),
        macros: MealMacros::new(
            round_half_up(daily.protein / n),
            round_half_up(daily.fat / n),
            round_half_up(daily.carbs / n),
        ),
    };

    vec![meal; num_meals as usize]
}

/// Macro grams for a meal in proportion to its share of the daily target.
pub fn meal_share_macros(daily: &MealMacros, meal_calories: f64, target: f64) -> MealMacros {
    if target <= 0.0 {
        return MealMacros::default();
    }
    let ratio = meal_calories / target;

    MealMacros::new(
        round_half_up(daily.protein * ratio),
        round_half_up(daily.fat * ratio),
        round_half_up(daily.carbs * ratio),
    )
}

/// Largest calorie deviation attributable to per-meal rounding.
pub fn rounding_tolerance(num_meals: u8) -> f64 {
    (num_meals.max(2) - 1) as f64
}

/// Compute every derived value of a plan.
///
/// Pure: identical inputs always produce identical output, and nothing about
/// the plan is modified.
pub fn compute_plan(plan: &CaloriePlan) -> PlanBreakdown {
    let bmr = calculate_bmr(plan.weight, plan.activity_level);
    let steps_calories = calculate_steps_calories(plan.daily_steps);
    let target_base = bmr - plan.deficit as f64;
    let target = target_base + steps_calories;
    let macros = calculate_macros(plan.weight, plan.protein_per_kg, target);
    let daily = macros.grams();

    let mut warnings = Vec::new();
    if target < 0.0 {
        warnings.push(PlanWarning::NegativeTarget { target });
    }
    if plan.weight > 0.0 && macros.carbs_kcal == 0.0 {
        warnings.push(PlanWarning::CarbsExhausted);
    }

    let n = plan.num_meals as usize;
    let meals = if plan.custom_distribution && plan.meal_calories.len() == n {
        let meals: Vec<MealTarget> = plan
            .meal_calories
            .iter()
            .enumerate()
            .map(|(i, &calories)| MealTarget {
                calories,
                macros: if plan.has_macro_overrides() {
                    plan.custom_macros[i]
                } else {
                    meal_share_macros(&daily, calories, target)
                },
            })
            .collect();

        let deviation = meals.iter().map(|m| m.calories).sum::<f64>() - target;
        if deviation.abs() > rounding_tolerance(plan.num_meals) {
            warnings.push(PlanWarning::DistributionDrift { deviation });
        }
        meals
    } else {
        if plan.custom_distribution {
            tracing::warn!(
                meals = n,
                overrides = plan.meal_calories.len(),
                "custom meal calories do not match meal count, using even split"
            );
        }
        even_distribution(target, &daily, plan.num_meals)
    };

    PlanBreakdown {
        bmr,
        steps_calories,
        target_base,
        target,
        macros,
        meals,
        warnings,
    }
}
