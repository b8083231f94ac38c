use chrono::NaiveDate;
use std::collections::HashMap;

use super::InsightsStore;
use crate::error::Result;
use crate::models::{ReferralRecord, Series, SeriesKey};

/// Keeps everything in maps so runs can be exercised without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub series: HashMap<SeriesKey, Series>,
    pub referrals: HashMap<String, Vec<ReferralRecord>>,
    pub raw: HashMap<(String, String, NaiveDate), serde_json::Value>,
}

impl InsightsStore for MemoryStore {
    fn load(&self, key: &SeriesKey) -> Result<Option<Series>> {
        Ok(self.series.get(key).cloned())
    }

    fn save(&mut self, key: &SeriesKey, series: &Series) -> Result<()> {
        self.series.insert(key.clone(), series.clone());
        Ok(())
    }

    fn save_referrals(&mut self, repository: &str, referrals: &[ReferralRecord]) -> Result<()> {
        self.referrals.insert(repository.to_string(), referrals.to_vec());
        Ok(())
    }

    fn archive_raw(
        &mut self,
        repository: &str,
        kind: &str,
        run_date: NaiveDate,
        raw: &serde_json::Value,
    ) -> Result<()> {
        self.raw.insert(
            (repository.to_string(), kind.to_string(), run_date),
            raw.clone(),
        );
        Ok(())
    }
}
