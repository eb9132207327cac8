use std::fmt::Write;

use crate::models::CaloriePlan;
use crate::planner::{DistributionTotals, PlanBreakdown, PlanWarning};

/// Human-readable text for a warning.
pub fn warning_text(warning: &PlanWarning) -> String {
    match warning {
        PlanWarning::NegativeTarget { target } => format!(
            "Deficit exceeds expenditure: target is {:.0} kcal",
            target
        ),
        PlanWarning::CarbsExhausted => {
            "Protein and fat already cover the target; carbs are at 0 g".to_string()
        }
        PlanWarning::DistributionDrift { deviation } => format!(
            "Custom meals are off target by {:+.0} kcal",
            deviation
        ),
    }
}

/// Render a plan, its derived values and the meal table.
pub fn format_plan(
    client_id: &str,
    plan: &CaloriePlan,
    breakdown: &PlanBreakdown,
    totals: &DistributionTotals,
) -> String {
    let mut out = String::new();
    let m = &breakdown.macros;

    // Writing to a String cannot fail.
    let _ = writeln!(out, "=== Plan for {} ===", client_id);
    let _ = writeln!(
        out,
        "Weight: {:.1} kg | Activity: {} | Deficit: {} kcal | Steps: {} | Protein: {:.1} g/kg",
        plan.weight, plan.activity_level, plan.deficit, plan.daily_steps, plan.protein_per_kg
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Energy ---");
    let _ = writeln!(out, "{:<23}{:>6.0} kcal", "Baseline:", breakdown.bmr);
    let _ = writeln!(out, "{:<23}{:>6.0} kcal", "Target (before steps):", breakdown.target_base);
    let _ = writeln!(out, "{:<23}{:>+6.0} kcal", "Steps bonus:", breakdown.steps_calories);
    let _ = writeln!(out, "{:<23}{:>6.0} kcal", "Target w/ steps:", breakdown.target);
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Macros ---");
    let _ = writeln!(out, "Protein {:>5.0} g {:>6.0} kcal", m.protein_g, m.protein_kcal);
    let _ = writeln!(out, "Fat     {:>5.0} g {:>6.0} kcal", m.fat_g, m.fat_kcal);
    let _ = writeln!(out, "Carbs   {:>5.0} g {:>6.0} kcal", m.carbs_g, m.carbs_kcal);
    let _ = writeln!(out);

    let mode = if plan.custom_distribution { "custom" } else { "even" };
    let _ = writeln!(out, "--- Meals ({}, {}) ---", breakdown.meals.len(), mode);
    for (i, meal) in breakdown.meals.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:>5.0} kcal | P {:>4.0} g  F {:>4.0} g  C {:>4.0} g",
            i + 1,
            meal.calories,
            meal.macros.protein,
            meal.macros.fat,
            meal.macros.carbs
        );
    }

    if plan.custom_distribution {
        let marker = if totals.is_balanced() { " " } else { "!" };
        let _ = writeln!(
            out,
            "{}  Total {:>5.0} / {:.0} kcal ({:+.0}) | P {:.0}/{:.0} g  F {:.0}/{:.0} g  C {:.0}/{:.0} g",
            marker,
            totals.calories,
            totals.target,
            totals.deviation,
            totals.macros.protein,
            totals.target_macros.protein,
            totals.macros.fat,
            totals.target_macros.fat,
            totals.macros.carbs,
            totals.target_macros.carbs
        );
    }

    if !breakdown.warnings.is_empty() {
        let _ = writeln!(out);
        for warning in &breakdown.warnings {
            let _ = writeln!(out, "! {}", warning_text(warning));
        }
    }

    out
}

/// Print a plan to stdout.
pub fn display_plan(
    client_id: &str,
    plan: &CaloriePlan,
    breakdown: &PlanBreakdown,
    totals: &DistributionTotals,
) {
    println!();
    print!("{}", format_plan(client_id, plan, breakdown, totals));
    println!();
}

/// Print stored client ids.
pub fn display_client_list(clients: &[String]) {
    if clients.is_empty() {
        println!("No stored plans.");
        return;
    }

    println!("=== Clients ({}) ===", clients.len());
    for client in clients {
        println!("  {}", client);
    }
}
