pub mod lenient;
pub mod plan;

pub use plan::{ActivityLevel, CaloriePlan, Macro, MealMacros};
