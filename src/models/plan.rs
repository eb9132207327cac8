use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::lenient;
use crate::planner::constants::{
    DEFAULT_NUM_MEALS, DEFAULT_PROTEIN_PER_KG, KCAL_PER_G_CARBS, KCAL_PER_G_FAT,
    KCAL_PER_G_PROTEIN,
};

/// Coarse activity bucket. The discriminant is the flat kcal-per-kg multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivityLevel {
    Sedentary = 25,
    #[default]
    Moderate = 30,
    High = 35,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 3] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Moderate,
        ActivityLevel::High,
    ];

    /// Flat kcal-per-kg multiplier for this level.
    pub fn multiplier(self) -> f64 {
        self as u32 as f64
    }

    /// Look up a level by its multiplier (25, 30 or 35).
    pub fn from_multiplier(multiplier: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| *level as u32 == multiplier)
    }

    pub fn name(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High => "high",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (x{})", self.name(), *self as u32)
    }
}

impl Serialize for ActivityLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(*self as u32)
    }
}

impl<'de> Deserialize<'de> for ActivityLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::uint(deserializer)?;
        Ok(Self::from_multiplier(raw).unwrap_or_else(|| {
            tracing::warn!(value = raw, "unknown activity level, using default");
            Self::default()
        }))
    }
}

/// One of the three tracked macronutrients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Macro {
    Protein,
    Fat,
    Carbs,
}

impl Macro {
    pub const ALL: [Macro; 3] = [Macro::Protein, Macro::Fat, Macro::Carbs];

    /// Energy density in kcal per gram.
    pub fn kcal_per_gram(self) -> f64 {
        match self {
            Macro::Protein => KCAL_PER_G_PROTEIN,
            Macro::Fat => KCAL_PER_G_FAT,
            Macro::Carbs => KCAL_PER_G_CARBS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Macro::Protein => "protein",
            Macro::Fat => "fat",
            Macro::Carbs => "carbs",
        }
    }
}

/// Macro grams for a single meal (or a whole day).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MealMacros {
    #[serde(default, deserialize_with = "lenient::number")]
    pub protein: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub fat: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub carbs: f64,
}

impl MealMacros {
    pub fn new(protein: f64, fat: f64, carbs: f64) -> Self {
        Self {
            protein,
            fat,
            carbs,
        }
    }

    pub fn get(&self, which: Macro) -> f64 {
        match which {
            Macro::Protein => self.protein,
            Macro::Fat => self.fat,
            Macro::Carbs => self.carbs,
        }
    }

    pub fn set(&mut self, which: Macro, grams: f64) {
        match which {
            Macro::Protein => self.protein = grams,
            Macro::Fat => self.fat = grams,
            Macro::Carbs => self.carbs = grams,
        }
    }

    /// Calories implied by these grams.
    pub fn calories(&self) -> f64 {
        Macro::ALL
            .into_iter()
            .map(|m| self.get(m) * m.kcal_per_gram())
            .sum()
    }
}

impl std::ops::Add for MealMacros {
    type Output = MealMacros;

    fn add(self, other: MealMacros) -> MealMacros {
        MealMacros::new(
            self.protein + other.protein,
            self.fat + other.fat,
            self.carbs + other.carbs,
        )
    }
}

impl std::iter::Sum for MealMacros {
    fn sum<I: Iterator<Item = MealMacros>>(iter: I) -> Self {
        iter.fold(MealMacros::default(), |acc, m| acc + m)
    }
}

/// A client's stored calorie plan: coach inputs plus optional per-meal overrides.
///
/// Serialises to the record shape exchanged with the plan store:
/// `{weight, activityLevel, deficit, dailySteps, proteinPerKg, numMeals,
/// customDistribution, mealCalories, customMacros}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaloriePlan {
    /// Body weight in kilograms.
    #[serde(default, deserialize_with = "lenient::number")]
    pub weight: f64,

    #[serde(default)]
    pub activity_level: ActivityLevel,

    /// Daily kcal subtracted from the baseline. Negative means a surplus.
    #[serde(default, deserialize_with = "lenient::int")]
    pub deficit: i32,

    #[serde(default, deserialize_with = "lenient::uint")]
    pub daily_steps: u32,

    #[serde(
        default = "default_protein_per_kg",
        deserialize_with = "lenient::number"
    )]
    pub protein_per_kg: f64,

    #[serde(default = "default_num_meals", deserialize_with = "lenient::small_uint")]
    pub num_meals: u8,

    #[serde(default)]
    pub custom_distribution: bool,

    /// Per-meal calories; only meaningful while `custom_distribution` is set.
    #[serde(default, deserialize_with = "lenient::numbers")]
    pub meal_calories: Vec<f64>,

    /// Per-meal macro grams, parallel to `meal_calories`. May be empty.
    #[serde(default, deserialize_with = "lenient::macro_rows")]
    pub custom_macros: Vec<MealMacros>,
}

fn default_protein_per_kg() -> f64 {
    DEFAULT_PROTEIN_PER_KG
}

fn default_num_meals() -> u8 {
    DEFAULT_NUM_MEALS
}

impl Default for CaloriePlan {
    fn default() -> Self {
        Self {
            weight: 0.0,
            activity_level: ActivityLevel::default(),
            deficit: 0,
            daily_steps: 0,
            protein_per_kg: DEFAULT_PROTEIN_PER_KG,
            num_meals: DEFAULT_NUM_MEALS,
            custom_distribution: false,
            meal_calories: Vec::new(),
            custom_macros: Vec::new(),
        }
    }
}

impl CaloriePlan {
    /// Whether custom macro overrides line up with the meal count.
    pub fn has_macro_overrides(&self) -> bool {
        self.custom_distribution && self.custom_macros.len() == self.num_meals as usize
    }

    /// Check the override-array invariants.
    ///
    /// Returns a description of the first violation, if any.
    pub fn invariant_violation(&self) -> Option<String> {
        let n = self.num_meals as usize;
        if self.custom_distribution {
            if self.meal_calories.len() != n {
                return Some(format!(
                    "custom distribution has {} meal calories for {} meals",
                    self.meal_calories.len(),
                    n
                ));
            }
            if !self.custom_macros.is_empty() && self.custom_macros.len() != n {
                return Some(format!(
                    "custom distribution has {} macro rows for {} meals",
                    self.custom_macros.len(),
                    n
                ));
            }
        }
        None
    }

    /// Drop override arrays that are not in use.
    pub fn normalize(&mut self) {
        if !self.custom_distribution {
            self.meal_calories.clear();
            self.custom_macros.clear();
        }
    }
}
