use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::InsightsStore;
use crate::error::Result;
use crate::models::{safe_name, MetricRecord, ReferralRecord, Series, SeriesKey};
use crate::series::merge;

/// File-backed store laid out as
///
/// ```text
/// <root>/<owner>_<name>_views.json      {"views": [...]}
/// <root>/<owner>_<name>_clones.json     {"clones": [...]}
/// <root>/<owner>_<name>_referrals.json  [...]
/// <root>/raw/<YYYYMMDD>/<owner>_<name>_<kind>.json
/// ```
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn series_path(&self, key: &SeriesKey) -> PathBuf {
        self.root.join(format!("{}.json", key.file_stem()))
    }

    fn referrals_path(&self, repository: &str) -> PathBuf {
        self.root.join(format!("{}_referrals.json", safe_name(repository)))
    }

    fn raw_path(&self, repository: &str, kind: &str, run_date: NaiveDate) -> PathBuf {
        self.root
            .join("raw")
            .join(run_date.format("%Y%m%d").to_string())
            .join(format!("{}_{kind}.json", safe_name(repository)))
    }
}

impl InsightsStore for JsonFileStore {
    fn load(&self, key: &SeriesKey) -> Result<Option<Series>> {
        let path = self.series_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let mut document: Map<String, Value> = serde_json::from_str(&contents)?;

        let records: Vec<MetricRecord> = match document.remove(key.kind.key()) {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };

        debug!("Loaded {} records from {}", records.len(), path.display());

        // Hand-edited files may be unsorted or have holes
        Ok(Some(merge(Series::empty(), &records)))
    }

    fn save(&mut self, key: &SeriesKey, series: &Series) -> Result<()> {
        let mut document = Map::new();
        document.insert(key.kind.key().to_string(), serde_json::to_value(series)?);

        write_json(&self.series_path(key), &document)
    }

    fn save_referrals(&mut self, repository: &str, referrals: &[ReferralRecord]) -> Result<()> {
        write_json(&self.referrals_path(repository), &referrals)
    }

    fn archive_raw(
        &mut self,
        repository: &str,
        kind: &str,
        run_date: NaiveDate,
        raw: &Value,
    ) -> Result<()> {
        write_json(&self.raw_path(repository, kind, run_date), raw)
    }
}

/// Pretty-prints `value` to a sibling temp file, then renames it over `path`.
/// The temp file is removed if anything fails before the rename lands.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let json = serde_json::to_string_pretty(value)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(json.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!("Wrote {}", path.display());
    Ok(())
}
