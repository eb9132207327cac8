use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::models::lenient::parse_f64;
use crate::models::ActivityLevel;
use crate::planner::ReconcileMode;

/// MacroPlanner — daily calorie targets, macro split, and meal distribution for coaching clients.
#[derive(Parser, Debug)]
#[command(name = "macro_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the plan store JSON file.
    #[arg(short, long, env = "MACRO_PLANNER_STORE")]
    pub store: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a client's plan and derived targets.
    Show {
        client: String,

        /// Print the breakdown as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Update plan inputs. Unspecified inputs keep their stored values.
    Set {
        client: String,

        /// Body weight in kg.
        #[arg(long, value_parser = parse_amount)]
        weight: Option<f64>,

        /// Activity multiplier.
        #[arg(long, value_enum)]
        activity: Option<ActivityArg>,

        /// Daily deficit in kcal (negative for a surplus).
        #[arg(long, allow_hyphen_values = true)]
        deficit: Option<i32>,

        /// Average daily steps.
        #[arg(long)]
        steps: Option<u32>,

        /// Protein grams per kg (1.6, 1.8, 2.0, 2.2 or 2.5).
        #[arg(long, value_parser = parse_amount)]
        protein: Option<f64>,
    },

    /// Change the number of meals. Resets any custom distribution.
    Meals { client: String, count: u8 },

    /// Turn custom meal distribution on or off.
    Custom {
        client: String,

        #[arg(value_enum)]
        state: Toggle,
    },

    /// Edit one meal of a custom distribution.
    Meal {
        client: String,

        /// Meal number, starting at 1.
        index: usize,

        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        calories: Option<f64>,

        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        protein: Option<f64>,

        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        fat: Option<f64>,

        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        carbs: Option<f64>,
    },

    /// Bring meal calories and meal macros back into agreement.
    Reconcile {
        client: String,

        #[arg(long, value_enum, default_value = "macros")]
        mode: ReconcileArg,
    },

    /// Export the per-meal table as CSV.
    Export { client: String, output: PathBuf },

    /// List clients with a stored plan.
    List,

    /// Edit a plan interactively.
    Edit { client: String },
}

/// Numeric flag parser: empty, NaN and otherwise unparsable values count as zero.
fn parse_amount(value: &str) -> Result<f64, String> {
    Ok(parse_f64(value))
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ActivityArg {
    /// x25
    Sedentary,
    /// x30
    Moderate,
    /// x35
    High,
}

impl From<ActivityArg> for ActivityLevel {
    fn from(arg: ActivityArg) -> Self {
        match arg {
            ActivityArg::Sedentary => ActivityLevel::Sedentary,
            ActivityArg::Moderate => ActivityLevel::Moderate,
            ActivityArg::High => ActivityLevel::High,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ReconcileArg {
    /// Recompute meal macros from meal calories.
    Macros,
    /// Recompute meal calories from meal macros.
    Calories,
}

impl From<ReconcileArg> for ReconcileMode {
    fn from(arg: ReconcileArg) -> Self {
        match arg {
            ReconcileArg::Macros => ReconcileMode::MacrosFromCalories,
            ReconcileArg::Calories => ReconcileMode::CaloriesFromMacros,
        }
    }
}
