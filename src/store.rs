mod json;
#[cfg(test)]
mod memory;

pub use json::JsonFileStore;
#[cfg(test)]
pub use memory::MemoryStore;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{ReferralRecord, Series, SeriesKey};

/// Durable home for merged series, referral snapshots and raw API responses.
pub trait InsightsStore {
    /// Returns `None` when nothing was ever saved under `key`.
    fn load(&self, key: &SeriesKey) -> Result<Option<Series>>;

    /// Replaces whatever was stored under `key`.
    fn save(&mut self, key: &SeriesKey, series: &Series) -> Result<()>;

    fn save_referrals(&mut self, repository: &str, referrals: &[ReferralRecord]) -> Result<()>;

    /// Keeps the unmodified response of one fetch, partitioned by run date.
    fn archive_raw(
        &mut self,
        repository: &str,
        kind: &str,
        run_date: NaiveDate,
        raw: &serde_json::Value,
    ) -> Result<()>;
}
