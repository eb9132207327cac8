use crate::error::{PlannerError, Result};
use crate::models::lenient::finite_or_zero;
use crate::models::{ActivityLevel, CaloriePlan, Macro};
use crate::planner::constants::{is_protein_preset, PROTEIN_PER_KG_OPTIONS};
use crate::planner::{
    self, compute_plan, DistributionTotals, PlanBreakdown, ReconcileMode,
};
use crate::state::store::PlanStore;

/// A coach's working copy of one client's plan.
///
/// Edits stay in memory until `save`. A failed load or save leaves the working
/// copy as it was so the coach can retry.
pub struct PlanSession<S: PlanStore> {
    store: S,
    client_id: String,
    plan: CaloriePlan,
    dirty: bool,
}

impl<S: PlanStore> PlanSession<S> {
    /// Open a session, loading the stored plan (or defaults).
    pub fn open(store: S, client_id: &str) -> Result<Self> {
        let plan = store.load(client_id)?;
        Ok(Self {
            store,
            client_id: client_id.to_string(),
            plan,
            dirty: false,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn plan(&self) -> &CaloriePlan {
        &self.plan
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether there are unsaved edits.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Derived values for the working copy.
    pub fn breakdown(&self) -> PlanBreakdown {
        compute_plan(&self.plan)
    }

    pub fn totals(&self) -> DistributionTotals {
        planner::custom_totals(&self.plan)
    }

    fn touch(&mut self) {
        self.dirty = true;
    }

    /// Set body weight. NaN and infinities count as zero.
    pub fn set_weight(&mut self, weight_kg: f64) -> Result<()> {
        let weight_kg = finite_or_zero(weight_kg);
        if weight_kg < 0.0 {
            return Err(PlannerError::InvalidInput(format!(
                "weight must not be negative, got {}",
                weight_kg
            )));
        }
        self.plan.weight = weight_kg;
        self.touch();
        Ok(())
    }

    pub fn set_activity_level(&mut self, level: ActivityLevel) {
        self.plan.activity_level = level;
        self.touch();
    }

    pub fn set_deficit(&mut self, deficit_kcal: i32) {
        self.plan.deficit = deficit_kcal;
        self.touch();
    }

    pub fn set_daily_steps(&mut self, steps: u32) {
        self.plan.daily_steps = steps;
        self.touch();
    }

    pub fn set_protein_per_kg(&mut self, protein_per_kg: f64) -> Result<()> {
        if !is_protein_preset(protein_per_kg) {
            return Err(PlannerError::InvalidInput(format!(
                "protein per kg must be one of {:?}, got {}",
                PROTEIN_PER_KG_OPTIONS, protein_per_kg
            )));
        }
        self.plan.protein_per_kg = protein_per_kg;
        self.touch();
        Ok(())
    }

    pub fn set_num_meals(&mut self, num_meals: u8) -> Result<()> {
        planner::set_num_meals(&mut self.plan, num_meals)?;
        self.touch();
        Ok(())
    }

    pub fn set_custom_distribution(&mut self, enabled: bool) {
        if enabled {
            planner::enable_custom_distribution(&mut self.plan);
        } else {
            planner::disable_custom_distribution(&mut self.plan);
        }
        self.touch();
    }

    pub fn set_meal_calories(&mut self, meal: usize, calories: f64) -> Result<()> {
        planner::set_meal_calories(&mut self.plan, meal, calories)?;
        self.touch();
        Ok(())
    }

    pub fn set_meal_macro(&mut self, meal: usize, which: Macro, grams: f64) -> Result<()> {
        planner::set_meal_macro(&mut self.plan, meal, which, grams)?;
        self.touch();
        Ok(())
    }

    pub fn reconcile(&mut self, mode: ReconcileMode) -> Result<()> {
        planner::reconcile(&mut self.plan, mode)?;
        self.touch();
        Ok(())
    }

    /// Write the full working copy to the store.
    pub fn save(&mut self) -> Result<()> {
        self.store.save(&self.client_id, &self.plan)?;
        self.plan.normalize();
        self.dirty = false;
        Ok(())
    }

    /// Discard edits and reload the stored plan.
    pub fn reload(&mut self) -> Result<()> {
        self.plan = self.store.load(&self.client_id)?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::store::MemoryStore;

    #[test]
    fn test_edits_are_not_saved_until_save() {
        let mut session = PlanSession::open(MemoryStore::new(), "anna").unwrap();
        session.set_weight(70.0).unwrap();
        assert!(session.is_dirty());
        assert!(!session.store().contains("anna").unwrap());

        session.save().unwrap();
        assert!(!session.is_dirty());
        assert_eq!(session.store().load("anna").unwrap().weight, 70.0);
    }

    #[test]
    fn test_reload_discards_edits() {
        let mut session = PlanSession::open(MemoryStore::new(), "anna").unwrap();
        session.set_weight(70.0).unwrap();
        session.save().unwrap();

        session.set_daily_steps(10000);
        session.reload().unwrap();
        assert_eq!(session.plan().daily_steps, 0);
        assert_eq!(session.plan().weight, 70.0);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut session = PlanSession::open(MemoryStore::new(), "anna").unwrap();
        assert!(session.set_weight(-1.0).is_err());
        assert!(session.set_protein_per_kg(1.7).is_err());
        assert!(session.set_protein_per_kg(2.2).is_ok());
        assert!(session.set_num_meals(9).is_err());
    }

    #[test]
    fn test_non_finite_weight_counts_as_zero() {
        let mut session = PlanSession::open(MemoryStore::new(), "anna").unwrap();
        session.set_weight(80.0).unwrap();
        session.set_weight(f64::NAN).unwrap();
        assert_eq!(session.plan().weight, 0.0);

        let breakdown = session.breakdown();
        assert_eq!(breakdown.target, 0.0);
        assert!(breakdown.meals.iter().all(|m| m.calories == 0.0));

        session.save().unwrap();
        assert_eq!(session.store().load("anna").unwrap().weight, 0.0);
    }

    #[test]
    fn test_meal_edits_stay_non_negative() {
        let mut session = PlanSession::open(MemoryStore::new(), "anna").unwrap();
        session.set_weight(80.0).unwrap();
        session.set_custom_distribution(true);

        assert!(session.set_meal_calories(0, -300.0).is_err());
        assert!(session.set_meal_macro(1, Macro::Protein, -20.0).is_err());
        session.set_meal_calories(2, f64::NAN).unwrap();

        let breakdown = session.breakdown();
        assert!(breakdown.meals.iter().all(|m| m.calories >= 0.0));
        assert!(breakdown
            .meals
            .iter()
            .all(|m| m.macros.protein >= 0.0 && m.macros.fat >= 0.0 && m.macros.carbs >= 0.0));
    }

    #[test]
    fn test_failed_save_keeps_working_copy() {
        let mut session = PlanSession::open(MemoryStore::new(), "anna").unwrap();
        session.set_custom_distribution(true);
        session.plan.meal_calories.pop();

        assert!(session.save().is_err());
        assert!(session.is_dirty());
        assert_eq!(session.plan().meal_calories.len(), 3);
    }
}
