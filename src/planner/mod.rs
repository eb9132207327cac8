pub mod calculations;
pub mod constants;
pub mod distribution;

pub use calculations::{
    calculate_bmr, calculate_macros, calculate_steps_calories, compute_plan, even_distribution,
    meal_share_macros, MacroSplit, MealTarget, PlanBreakdown, PlanWarning,
};
pub use constants::*;
pub use distribution::{
    custom_totals, disable_custom_distribution, enable_custom_distribution, reconcile,
    set_meal_calories, set_meal_macro, set_num_meals, DistributionTotals, ReconcileMode,
};
