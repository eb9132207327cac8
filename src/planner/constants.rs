/// Energy density of protein (kcal per gram).
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;

/// Energy density of fat (kcal per gram).
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Energy density of carbohydrates (kcal per gram).
pub const KCAL_PER_G_CARBS: f64 = 4.0;

/// Fat target per kilogram of body weight. Not coach-adjustable.
pub const FAT_PER_KG: f64 = 0.7;

/// Bonus calories granted per 1,000 daily steps.
pub const KCAL_PER_1000_STEPS: f64 = 50.0;

/// Protein-per-kilogram presets offered to the coach.
pub const PROTEIN_PER_KG_OPTIONS: [f64; 5] = [1.6, 1.8, 2.0, 2.2, 2.5];

/// Allowed number of meals per day.
pub const MIN_MEALS: u8 = 2;
pub const MAX_MEALS: u8 = 6;

// ─────────────────────────────────────────────────────────────────────────────
// Defaults for a client with no stored plan
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_PROTEIN_PER_KG: f64 = 2.0;

pub const DEFAULT_NUM_MEALS: u8 = 4;

// ─────────────────────────────────────────────────────────────────────────────
// Display
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum similarity for suggesting a stored client id.
pub const CLIENT_SUGGESTION_THRESHOLD: f64 = 0.8;

/// Round half up, the way the coach form rounds displayed values.
#[inline]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Whether a protein-per-kg value is one of the presets.
pub fn is_protein_preset(value: f64) -> bool {
    PROTEIN_PER_KG_OPTIONS
        .iter()
        .any(|&option| (option - value).abs() < 1e-9)
}

/// Whether a meal count is within the supported range.
pub fn is_valid_meal_count(num_meals: u8) -> bool {
    (MIN_MEALS..=MAX_MEALS).contains(&num_meals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(525.0), 525.0);
        assert_eq!(round_half_up(59.75), 60.0);
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4999), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
    }

    #[test]
    fn test_protein_presets() {
        assert!(is_protein_preset(1.6));
        assert!(is_protein_preset(2.5));
        assert!(!is_protein_preset(1.7));
        assert!(!is_protein_preset(0.0));
    }

    #[test]
    fn test_meal_count_bounds() {
        assert!(!is_valid_meal_count(1));
        assert!(is_valid_meal_count(2));
        assert!(is_valid_meal_count(6));
        assert!(!is_valid_meal_count(7));
    }
}
