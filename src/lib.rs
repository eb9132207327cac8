pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;
pub mod state;

pub use error::{PlannerError, Result};
pub use models::{ActivityLevel, CaloriePlan, Macro, MealMacros};
pub use planner::{compute_plan, PlanBreakdown};
