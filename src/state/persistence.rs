use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::CaloriePlan;
use crate::state::store::{prepare_for_save, PlanStore};

/// Plans for all clients kept in a single JSON file, keyed by client id.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored plan. A missing or empty file holds no plans.
    fn read_all(&self) -> Result<BTreeMap<String, CaloriePlan>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    /// Write every plan. Goes through a temp file so a failed write leaves the
    /// previous file intact.
    fn write_all(&self, plans: &BTreeMap<String, CaloriePlan>) -> Result<()> {
        let json = serde_json::to_string_pretty(plans)?;

        let mut tmp_name = OsString::from(self.path.as_os_str());
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl PlanStore for JsonFileStore {
    fn load(&self, client_id: &str) -> Result<CaloriePlan> {
        let mut plans = self.read_all()?;
        match plans.remove(client_id) {
            Some(plan) => {
                tracing::debug!(client = client_id, path = %self.path.display(), "plan loaded");
                Ok(plan)
            }
            None => {
                tracing::debug!(client = client_id, "no stored plan, using defaults");
                Ok(CaloriePlan::default())
            }
        }
    }

    fn save(&mut self, client_id: &str, plan: &CaloriePlan) -> Result<()> {
        let record = prepare_for_save(plan)?;
        let mut plans = self.read_all()?;
        plans.insert(client_id.to_string(), record);
        self.write_all(&plans)?;
        tracing::debug!(client = client_id, path = %self.path.display(), "plan saved");
        Ok(())
    }

    fn clients(&self) -> Result<Vec<String>> {
        Ok(self.read_all()?.into_keys().collect())
    }
}
