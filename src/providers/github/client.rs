use async_trait::async_trait;
use log::debug;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{InsightsError, Result};
use crate::models::ReferralRecord;
use crate::providers::{Snapshot, TrafficResponse, TrafficSource};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

pub struct GitHubClient {
    client: Client,
    api_url: Url,
    token: Token,
}

impl GitHubClient {
    pub fn new(api_url: &Url, token: Token) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("repo-insights/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InsightsError::Config(format!("Failed to create HTTP client: {e}")))?;

        // Url::join drops the last segment unless the base ends in a slash
        let mut api_url = api_url.clone();
        if !api_url.path().ends_with('/') {
            api_url.set_path(&format!("{}/", api_url.path()));
        }

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    fn traffic_url(&self, repository: &str, endpoint: &str) -> Result<Url> {
        self.api_url
            .join(&format!("repos/{repository}/traffic/{endpoint}"))
            .map_err(|e| InsightsError::Config(format!("Invalid traffic URL: {e}")))
    }

    async fn get_snapshot<T: DeserializeOwned>(
        &self,
        repository: &str,
        endpoint: &str,
        what: &str,
    ) -> Result<Snapshot<T>> {
        let url = self.traffic_url(repository, endpoint)?;
        debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.as_str())
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InsightsError::Api(format!(
                "Failed to fetch {what} for {repository}: {status} - {body}"
            )));
        }

        let raw: serde_json::Value = response.json().await?;
        let data = serde_json::from_value(raw.clone())?;

        Ok(Snapshot { raw, data })
    }
}

#[async_trait]
impl TrafficSource for GitHubClient {
    async fn fetch_views(&self, repository: &str) -> Result<Snapshot<TrafficResponse>> {
        self.get_snapshot(repository, "views", "views").await
    }

    async fn fetch_clones(&self, repository: &str) -> Result<Snapshot<TrafficResponse>> {
        self.get_snapshot(repository, "clones", "clones").await
    }

    async fn fetch_referrals(&self, repository: &str) -> Result<Snapshot<Vec<ReferralRecord>>> {
        self.get_snapshot(repository, "popular/referrers", "referrals").await
    }
}
