use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Traffic metric tracked as a daily time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Views,
    Clones,
}

impl MetricKind {
    /// Key used both in persisted documents and in file names.
    pub fn key(self) -> &'static str {
        match self {
            MetricKind::Views => "views",
            MetricKind::Clones => "clones",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One day of traffic for a repository and metric kind.
///
/// Serialized in the same shape the traffic API returns, so persisted
/// history and raw snapshots read alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(rename = "timestamp", with = "day_timestamp")]
    pub date: NaiveDate,
    #[serde(rename = "count")]
    pub total: u64,
    #[serde(rename = "uniques")]
    pub unique: u64,
}

impl MetricRecord {
    pub fn new(date: NaiveDate, total: u64, unique: u64) -> Self {
        Self {
            date,
            total,
            unique,
        }
    }

    /// Zero-valued record standing in for a day with no observed traffic.
    pub fn placeholder(date: NaiveDate) -> Self {
        Self::new(date, 0, 0)
    }

    /// Takes the higher of each counter independently.
    pub fn absorb(&mut self, other: &MetricRecord) {
        self.total = self.total.max(other.total);
        self.unique = self.unique.max(other.unique);
    }
}

/// Gapless, date-sorted history of one metric for one repository.
///
/// Only [`crate::series::merge`] builds non-empty values, which is what keeps
/// the ordering and no-gap guarantees intact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Series(Vec<MetricRecord>);

impl Series {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_sorted(records: Vec<MetricRecord>) -> Self {
        Self(records)
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.0
    }

    pub fn into_records(self) -> Vec<MetricRecord> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.0.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.0.last().map(|r| r.date)
    }
}

/// Latest breakdown of where visitors came from. Never merged historically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralRecord {
    #[serde(rename = "referrer")]
    pub source: String,
    #[serde(rename = "count")]
    pub total: u64,
    #[serde(rename = "uniques")]
    pub unique: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySummary {
    pub repository: String,
    pub total_views: u64,
    pub total_clones: u64,
}

/// Identifies one persisted series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub repository: String,
    pub kind: MetricKind,
}

impl SeriesKey {
    pub fn new(repository: &str, kind: MetricKind) -> Self {
        Self {
            repository: repository.to_string(),
            kind,
        }
    }

    pub fn file_stem(&self) -> String {
        format!("{}_{}", safe_name(&self.repository), self.kind)
    }
}

/// Flattens an `owner/name` identifier into something usable as a file name.
pub fn safe_name(repository: &str) -> String {
    repository.replace('/', "_")
}

/// Day-granularity timestamps in the `YYYY-MM-DDT00:00:00Z` wire form.
mod day_timestamp {
    use super::*;
    use serde::{de, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{}T00:00:00Z", date.format("%Y-%m-%d")))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub(crate) fn parse(raw: &str) -> crate::error::Result<NaiveDate> {
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
            return Ok(timestamp.with_timezone(&Utc).date_naive());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| crate::error::InsightsError::InvalidDate(raw.to_string()))
    }
}
