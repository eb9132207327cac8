use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Custom distribution is not enabled")]
    CustomDistributionInactive,

    /// Already reported to the user with a generic notice.
    #[error("{0}")]
    Notified(Box<PlannerError>),

    #[error("Meal {index} out of range (plan has {num_meals} meals)")]
    MealOutOfRange { index: usize, num_meals: usize },
}

pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notified_shows_the_underlying_error() {
        let inner = PlannerError::InvalidPlan("mealCalories has 3 entries".to_string());
        let notified = PlannerError::Notified(Box::new(inner));
        assert_eq!(
            notified.to_string(),
            "Invalid plan: mealCalories has 3 entries"
        );
    }
}
