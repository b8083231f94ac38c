use chrono::NaiveDate;
use log::{debug, error, info, warn};

use crate::error::Result;
use crate::models::{MetricKind, MetricRecord, RepositorySummary, Series, SeriesKey};
use crate::providers::TrafficSource;
use crate::report::{RepositorySection, Report};
use crate::series::{merge, total_of, unique_total_of, Rankings};
use crate::store::InsightsStore;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub run_date: NaiveDate,
    pub top: usize,
    pub isolate_failures: bool,
}

/// Walks the repositories in order, threading the cross-repository rankings
/// through each step, and returns the assembled report.
///
/// Without `isolate_failures` the first failing repository aborts the run.
pub async fn collect<S, T>(
    source: &S,
    store: &mut T,
    repositories: &[String],
    options: &RunOptions,
) -> Result<Report>
where
    S: TrafficSource + Sync,
    T: InsightsStore,
{
    let mut report = Report::new(options.top);
    let mut rankings = Rankings::default();

    for repository in repositories {
        info!("Collecting traffic insights for repository: {repository}");

        match collect_repository(source, store, repository, options.run_date).await {
            Ok(section) => {
                rankings = rankings.record(section.summary.clone());
                report.add_section(section);
            }
            Err(e) if options.isolate_failures => {
                error!("Skipping {repository}: {e}");
                report.add_failure(repository, &e.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    report.set_rankings(rankings);
    Ok(report)
}

async fn collect_repository<S, T>(
    source: &S,
    store: &mut T,
    repository: &str,
    run_date: NaiveDate,
) -> Result<RepositorySection>
where
    S: TrafficSource + Sync,
    T: InsightsStore,
{
    let views = source.fetch_views(repository).await?;
    let clones = source.fetch_clones(repository).await?;
    let referrals = source.fetch_referrals(repository).await?;
    debug!(
        "{repository}: API window holds {} views ({} unique) and {} clones ({} unique)",
        views.data.count, views.data.uniques, clones.data.count, clones.data.uniques
    );

    store.archive_raw(repository, MetricKind::Views.key(), run_date, &views.raw)?;
    store.archive_raw(repository, MetricKind::Clones.key(), run_date, &clones.raw)?;
    store.archive_raw(repository, "referrals", run_date, &referrals.raw)?;

    let merged_views = update_series(store, repository, MetricKind::Views, &views.data.records)?;
    let merged_clones =
        update_series(store, repository, MetricKind::Clones, &clones.data.records)?;
    store.save_referrals(repository, &referrals.data)?;

    if referrals.data.is_empty() {
        warn!("No referral sources reported for {repository}");
    }

    let summary = RepositorySummary {
        repository: repository.to_string(),
        total_views: total_of(&merged_views),
        total_clones: total_of(&merged_clones),
    };
    if let (Some(first), Some(last)) = (merged_views.first_date(), merged_views.last_date()) {
        info!(
            "{repository}: {} days ({first}..{last}), {} views ({} unique), {} clones",
            merged_views.len(),
            summary.total_views,
            unique_total_of(&merged_views),
            summary.total_clones
        );
    }

    Ok(RepositorySection {
        summary,
        views: merged_views,
        clones: merged_clones,
        referrals: referrals.data,
    })
}

fn update_series<T: InsightsStore>(
    store: &mut T,
    repository: &str,
    kind: MetricKind,
    incoming: &[MetricRecord],
) -> Result<Series> {
    let key = SeriesKey::new(repository, kind);
    let existing = store.load(&key)?.unwrap_or_default();
    let merged = merge(existing, incoming);
    store.save(&key, &merged)?;
    Ok(merged)
}
