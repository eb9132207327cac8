use dialoguer::{Confirm, Input, Select};

use crate::error::{PlannerError, Result};
use crate::interface::render::display_plan;
use crate::models::lenient::parse_f64;
use crate::models::{ActivityLevel, Macro};
use crate::planner::constants::{MAX_MEALS, MIN_MEALS, PROTEIN_PER_KG_OPTIONS};
use crate::planner::ReconcileMode;
use crate::state::{PlanSession, PlanStore};

const MENU: [&str; 12] = [
    "Weight",
    "Activity level",
    "Deficit",
    "Daily steps",
    "Protein per kg",
    "Number of meals",
    "Toggle custom distribution",
    "Edit meal calories",
    "Edit meal macro",
    "Reconcile meals",
    "Save",
    "Quit",
];

/// Prompt for a number. Empty or unparsable input counts as zero.
pub fn prompt_number(prompt: &str, current: f64) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(format!("{}", current))
        .allow_empty(true)
        .interact_text()?;

    Ok(parse_f64(&input))
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Pick a meal (0-based) from the plan.
fn prompt_meal(num_meals: u8) -> Result<usize> {
    let items: Vec<String> = (1..=num_meals).map(|i| format!("Meal {}", i)).collect();
    Ok(Select::new()
        .with_prompt("Which meal?")
        .items(&items)
        .default(0)
        .interact()?)
}

fn prompt_activity(current: ActivityLevel) -> Result<ActivityLevel> {
    let items: Vec<String> = ActivityLevel::ALL.iter().map(|l| l.to_string()).collect();
    let default = ActivityLevel::ALL
        .iter()
        .position(|l| *l == current)
        .unwrap_or(1);
    let selection = Select::new()
        .with_prompt("Activity level")
        .items(&items)
        .default(default)
        .interact()?;
    Ok(ActivityLevel::ALL[selection])
}

fn prompt_protein(current: f64) -> Result<f64> {
    let items: Vec<String> = PROTEIN_PER_KG_OPTIONS
        .iter()
        .map(|p| format!("{:.1} g/kg", p))
        .collect();
    let default = PROTEIN_PER_KG_OPTIONS
        .iter()
        .position(|p| (p - current).abs() < 1e-9)
        .unwrap_or(2);
    let selection = Select::new()
        .with_prompt("Protein per kg")
        .items(&items)
        .default(default)
        .interact()?;
    Ok(PROTEIN_PER_KG_OPTIONS[selection])
}

fn prompt_num_meals(current: u8) -> Result<u8> {
    let counts: Vec<u8> = (MIN_MEALS..=MAX_MEALS).collect();
    let items: Vec<String> = counts.iter().map(|n| n.to_string()).collect();
    let default = counts.iter().position(|n| *n == current).unwrap_or(0);
    let selection = Select::new()
        .with_prompt("Number of meals (resets custom distribution)")
        .items(&items)
        .default(default)
        .interact()?;
    Ok(counts[selection])
}

fn prompt_macro() -> Result<Macro> {
    let items: Vec<&str> = Macro::ALL.iter().map(|m| m.name()).collect();
    let selection = Select::new()
        .with_prompt("Which macro?")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(Macro::ALL[selection])
}

fn prompt_reconcile_mode() -> Result<ReconcileMode> {
    let selection = Select::new()
        .with_prompt("Reconcile")
        .items(&[
            "Macros from meal calories",
            "Meal calories from macros",
        ])
        .default(0)
        .interact()?;
    Ok(if selection == 0 {
        ReconcileMode::MacrosFromCalories
    } else {
        ReconcileMode::CaloriesFromMacros
    })
}

/// Apply one menu action. Returns `false` when the editor should close.
fn apply_action<S: PlanStore>(session: &mut PlanSession<S>, action: usize) -> Result<bool> {
    let plan = session.plan().clone();

    match action {
        0 => session.set_weight(prompt_number("Weight (kg)", plan.weight)?.max(0.0))?,
        1 => session.set_activity_level(prompt_activity(plan.activity_level)?),
        2 => session.set_deficit(
            prompt_number("Deficit (kcal)", plan.deficit as f64)?.round() as i32,
        ),
        3 => session.set_daily_steps(
            prompt_number("Daily steps", plan.daily_steps as f64)?.round() as u32,
        ),
        4 => session.set_protein_per_kg(prompt_protein(plan.protein_per_kg)?)?,
        5 => session.set_num_meals(prompt_num_meals(plan.num_meals)?)?,
        6 => session.set_custom_distribution(!plan.custom_distribution),
        7 | 8 | 9 if !plan.custom_distribution => {
            println!("Enable custom distribution first.");
        }
        7 => {
            let meal = prompt_meal(plan.num_meals)?;
            let current = plan.meal_calories.get(meal).copied().unwrap_or(0.0);
            let calories = prompt_number("Meal calories (kcal)", current)?;
            session.set_meal_calories(meal, calories)?;
        }
        8 => {
            let meal = prompt_meal(plan.num_meals)?;
            let which = prompt_macro()?;
            let current = session
                .breakdown()
                .meals
                .get(meal)
                .map(|m| m.macros.get(which))
                .unwrap_or(0.0);
            let grams = prompt_number(&format!("{} (g)", which.name()), current)?;
            session.set_meal_macro(meal, which, grams)?;
        }
        9 => session.reconcile(prompt_reconcile_mode()?)?,
        10 => match session.save() {
            Ok(()) => println!("Plan saved."),
            Err(e) => {
                tracing::error!(error = %e, client = session.client_id(), "save failed");
                println!("Could not save the plan. Please try again.");
            }
        },
        _ => {
            if session.is_dirty() && prompt_yes_no("Save changes before quitting?", true)? {
                session.save()?;
                println!("Plan saved.");
            }
            return Ok(false);
        }
    }

    Ok(true)
}

/// Interactive editing loop. Every change re-renders the plan.
pub fn run_editor<S: PlanStore>(session: &mut PlanSession<S>) -> Result<()> {
    loop {
        let breakdown = session.breakdown();
        display_plan(session.client_id(), session.plan(), &breakdown, &session.totals());

        let title = if session.is_dirty() {
            "What next? (unsaved changes)"
        } else {
            "What next?"
        };
        let action = Select::new()
            .with_prompt(title)
            .items(&MENU)
            .default(0)
            .interact()?;

        match apply_action(session, action) {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(e @ PlannerError::Prompt(_)) => return Err(e),
            Err(e) => println!("{}", e),
        }
    }
}
