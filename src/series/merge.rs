use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::{MetricRecord, Series};

/// Folds freshly fetched records into a persisted series.
///
/// Records sharing a day keep the highest `total` and `unique` seen on either
/// side, since the API backfills partial days and counts must never go
/// backwards. Every day between the first and last observed date is
/// materialized, with zero placeholders where nothing was recorded.
pub fn merge(existing: Series, incoming: &[MetricRecord]) -> Series {
    let mut by_date: BTreeMap<NaiveDate, MetricRecord> = BTreeMap::new();

    for record in existing
        .into_records()
        .into_iter()
        .chain(incoming.iter().copied())
    {
        by_date
            .entry(record.date)
            .and_modify(|current| current.absorb(&record))
            .or_insert(record);
    }

    fill_gaps(&mut by_date);

    Series::from_sorted(by_date.into_values().collect())
}

fn fill_gaps(by_date: &mut BTreeMap<NaiveDate, MetricRecord>) {
    let (Some(&first), Some(&last)) = (by_date.keys().next(), by_date.keys().next_back()) else {
        return;
    };

    for date in first.iter_days().take_while(|date| *date <= last) {
        by_date
            .entry(date)
            .or_insert_with(|| MetricRecord::placeholder(date));
    }
}
