use std::path::Path;

use crate::error::Result;
use crate::planner::PlanBreakdown;

/// Write the per-meal table, followed by a total row, to a CSV file.
pub fn write_meals_csv(breakdown: &PlanBreakdown, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["meal", "calories", "protein_g", "fat_g", "carbs_g"])?;

    for (i, meal) in breakdown.meals.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            format!("{:.0}", meal.calories),
            format!("{:.0}", meal.macros.protein),
            format!("{:.0}", meal.macros.fat),
            format!("{:.0}", meal.macros.carbs),
        ])?;
    }

    let total = breakdown.meal_macros_total();
    wtr.write_record([
        "total".to_string(),
        format!("{:.0}", breakdown.meal_calories_total()),
        format!("{:.0}", total.protein),
        format!("{:.0}", total.fat),
        format!("{:.0}", total.carbs),
    ])?;

    wtr.flush()?;
    Ok(())
}
