use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::models::{RepositorySummary, Series};

/// One projected column of a series, aligned by date for charting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyValues {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<u64>,
}

impl DailyValues {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn max(&self) -> u64 {
        self.values.iter().copied().max().unwrap_or(0)
    }
}

pub fn total_of(series: &Series) -> u64 {
    series.records().iter().map(|r| r.total).sum()
}

pub fn unique_total_of(series: &Series) -> u64 {
    series.records().iter().map(|r| r.unique).sum()
}

/// Splits a series into its `total` and `unique` columns.
pub fn split_series(series: &Series) -> (DailyValues, DailyValues) {
    let dates: Vec<NaiveDate> = series.records().iter().map(|r| r.date).collect();

    let totals = DailyValues {
        dates: dates.clone(),
        values: series.records().iter().map(|r| r.total).collect(),
    };
    let uniques = DailyValues {
        dates,
        values: series.records().iter().map(|r| r.unique).collect(),
    };

    (totals, uniques)
}

/// Highest `n` entries by value. Ties keep the map's insertion order.
pub fn top_n(summaries: &IndexMap<String, u64>, n: usize) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = summaries
        .iter()
        .map(|(repository, value)| (repository.clone(), *value))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Cross-repository totals gathered while walking the repository list.
#[derive(Debug, Clone, Default)]
pub struct Rankings {
    pub views: IndexMap<String, u64>,
    pub clones: IndexMap<String, u64>,
}

impl Rankings {
    #[must_use]
    pub fn record(mut self, summary: RepositorySummary) -> Self {
        self.views.insert(summary.repository.clone(), summary.total_views);
        self.clones.insert(summary.repository, summary.total_clones);
        self
    }

    pub fn top_views(&self, n: usize) -> Vec<(String, u64)> {
        top_n(&self.views, n)
    }

    pub fn top_clones(&self, n: usize) -> Vec<(String, u64)> {
        top_n(&self.clones, n)
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
