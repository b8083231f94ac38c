pub mod github;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{MetricRecord, ReferralRecord};

/// A fetched response kept both as the unmodified JSON and as typed data.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub raw: serde_json::Value,
    pub data: T,
}

/// Daily views or clones as returned by the traffic endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrafficResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub uniques: u64,
    #[serde(alias = "views", alias = "clones", default)]
    pub records: Vec<MetricRecord>,
}

#[async_trait]
pub trait TrafficSource {
    async fn fetch_views(&self, repository: &str) -> Result<Snapshot<TrafficResponse>>;

    async fn fetch_clones(&self, repository: &str) -> Result<Snapshot<TrafficResponse>>;

    async fn fetch_referrals(&self, repository: &str) -> Result<Snapshot<Vec<ReferralRecord>>>;
}
