use std::collections::BTreeMap;

use strsim::jaro_winkler;

use crate::error::{PlannerError, Result};
use crate::models::CaloriePlan;
use crate::planner::constants::CLIENT_SUGGESTION_THRESHOLD;

/// Storage for one calorie plan per client.
///
/// `save` always replaces the whole record; there is no partial update.
pub trait PlanStore {
    /// Load a client's plan, or the default plan if none is stored.
    fn load(&self, client_id: &str) -> Result<CaloriePlan>;

    /// Overwrite a client's plan.
    fn save(&mut self, client_id: &str, plan: &CaloriePlan) -> Result<()>;

    /// Ids of all clients with a stored plan, sorted.
    fn clients(&self) -> Result<Vec<String>>;

    /// Whether a plan is stored for this client.
    fn contains(&self, client_id: &str) -> Result<bool> {
        Ok(self.clients()?.iter().any(|c| c == client_id))
    }
}

/// Normalise a plan for storage and reject broken override arrays.
pub fn prepare_for_save(plan: &CaloriePlan) -> Result<CaloriePlan> {
    let mut record = plan.clone();
    record.normalize();
    if let Some(reason) = record.invariant_violation() {
        return Err(PlannerError::InvalidPlan(reason));
    }
    Ok(record)
}

/// Closest stored client id to `query`, if any is similar enough.
pub fn closest_client<'a>(clients: &'a [String], query: &str) -> Option<&'a str> {
    let query = query.to_lowercase();
    clients
        .iter()
        .map(|c| (c, jaro_winkler(&c.to_lowercase(), &query)))
        .filter(|(_, score)| *score >= CLIENT_SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(c, _)| c.as_str())
}

/// In-process store, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    plans: BTreeMap<String, CaloriePlan>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlanStore for MemoryStore {
    fn load(&self, client_id: &str) -> Result<CaloriePlan> {
        Ok(self.plans.get(client_id).cloned().unwrap_or_default())
    }

    fn save(&mut self, client_id: &str, plan: &CaloriePlan) -> Result<()> {
        let record = prepare_for_save(plan)?;
        self.plans.insert(client_id.to_string(), record);
        Ok(())
    }

    fn clients(&self) -> Result<Vec<String>> {
        Ok(self.plans.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealMacros;

    #[test]
    fn test_load_missing_returns_default() {
        let store = MemoryStore::new();
        assert_eq!(store.load("nobody").unwrap(), CaloriePlan::default());
    }

    #[test]
    fn test_save_overwrites_whole_record() {
        let mut store = MemoryStore::new();
        let first = CaloriePlan {
            weight: 90.0,
            daily_steps: 12000,
            ..Default::default()
        };
        store.save("anna", &first).unwrap();

        let second = CaloriePlan {
            weight: 85.0,
            ..Default::default()
        };
        store.save("anna", &second).unwrap();

        let loaded = store.load("anna").unwrap();
        assert_eq!(loaded.weight, 85.0);
        assert_eq!(loaded.daily_steps, 0);
    }

    #[test]
    fn test_save_drops_inactive_overrides() {
        let mut store = MemoryStore::new();
        let plan = CaloriePlan {
            meal_calories: vec![500.0; 4],
            custom_macros: vec![MealMacros::default(); 4],
            ..Default::default()
        };
        store.save("ben", &plan).unwrap();

        let loaded = store.load("ben").unwrap();
        assert!(loaded.meal_calories.is_empty());
        assert!(loaded.custom_macros.is_empty());
    }

    #[test]
    fn test_save_rejects_wrong_length() {
        let mut store = MemoryStore::new();
        let plan = CaloriePlan {
            custom_distribution: true,
            meal_calories: vec![500.0; 3],
            ..Default::default()
        };
        assert!(matches!(
            store.save("cara", &plan),
            Err(PlannerError::InvalidPlan(_))
        ));
        assert!(!store.contains("cara").unwrap());
    }

    #[test]
    fn test_closest_client() {
        let clients = vec!["anna-smith".to_string(), "ben-jones".to_string()];
        assert_eq!(closest_client(&clients, "anna-smtih"), Some("anna-smith"));
        assert_eq!(closest_client(&clients, "zzz"), None);
    }
}
