use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use crate::config::Config;
use crate::insights::{self, RunOptions};
use crate::providers::github::{GitHubClient, DEFAULT_API_URL};
use crate::store::JsonFileStore;

#[derive(Parser)]
#[command(name = "repo-insights")]
#[command(author, version, about = "Repository traffic insights", long_about = None)]
pub struct Cli {
    /// GitHub personal access token with push access to the repositories
    #[arg(short, long, env = "INPUT_PAT-TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Comma-separated repositories to track (e.g., "owner/name,owner/other")
    #[arg(short, long, env = "INPUT_REPOS", value_delimiter = ',')]
    repos: Vec<String>,

    /// Directory receiving the report and persisted data
    #[arg(short, long, default_value = "insights")]
    output_dir: PathBuf,

    /// GitHub API base URL
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Number of repositories listed in each ranking
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Keep going when a repository fails and list it in the report
    #[arg(long, default_value_t = false)]
    isolate_failures: bool,
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let config = Config::new(
            self.token.as_deref(),
            &self.repos,
            &self.api_url,
            self.output_dir.clone(),
            self.top,
            self.isolate_failures,
        )?;

        info!(
            "Collecting insights for {} repositories",
            config.repositories.len()
        );

        let report_path = config.report_path();
        let mut store = JsonFileStore::new(config.data_dir());
        let options = RunOptions {
            run_date: Utc::now().date_naive(),
            top: config.top,
            isolate_failures: config.isolate_failures,
        };
        let client = GitHubClient::new(&config.api_url, config.token)?;

        let report = insights::collect(&client, &mut store, &config.repositories, &options).await?;

        std::fs::create_dir_all(&config.output_dir)
            .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;
        std::fs::write(&report_path, report.render())
            .with_context(|| format!("Failed to write {}", report_path.display()))?;
        info!("Insights written to: {}", report_path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn cli_for(api_url: String, output_dir: &Path, repos: &[&str]) -> Cli {
        Cli {
            token: Some("ghp_abc".to_string()),
            repos: repos.iter().map(|r| (*r).to_string()).collect(),
            output_dir: output_dir.to_path_buf(),
            api_url,
            top: 10,
            isolate_failures: false,
        }
    }

    async fn mock_traffic(server: &mut mockito::ServerGuard, repository: &str) {
        for (endpoint, body) in [
            (
                "views",
                r#"{"count": 12, "uniques": 3, "views": [
                    {"timestamp": "2024-01-01T00:00:00Z", "count": 5, "uniques": 2},
                    {"timestamp": "2024-01-03T00:00:00Z", "count": 7, "uniques": 1}
                ]}"#,
            ),
            (
                "clones",
                r#"{"count": 2, "uniques": 1, "clones": [
                    {"timestamp": "2024-01-02T00:00:00Z", "count": 2, "uniques": 1}
                ]}"#,
            ),
            ("popular/referrers", r#"[{"referrer": "github.com", "count": 9, "uniques": 4}]"#),
        ] {
            server
                .mock("GET", format!("/repos/{repository}/traffic/{endpoint}").as_str())
                .with_status(200)
                .with_body(body)
                .create_async()
                .await;
        }
    }

    #[test]
    fn test_cli_splits_repositories() {
        let cli = Cli::parse_from([
            "repo-insights",
            "--token",
            "ghp_abc",
            "--repos",
            "octo/one,octo/two",
            "--top",
            "3",
        ]);

        assert_eq!(cli.repos, vec!["octo/one", "octo/two"]);
        assert_eq!(cli.top, 3);
        assert_eq!(cli.api_url, DEFAULT_API_URL);
        assert!(!cli.isolate_failures);
    }

    #[tokio::test]
    async fn test_execute_without_repositories_fails_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        let cli = Cli {
            token: Some("ghp_abc".to_string()),
            repos: Vec::new(),
            output_dir: output.clone(),
            api_url: DEFAULT_API_URL.to_string(),
            top: 10,
            isolate_failures: false,
        };

        let err = cli.execute().await.unwrap_err();

        assert!(err.to_string().contains("must be provided"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_execute_writes_report_and_data() {
        let mut server = mockito::Server::new_async().await;
        mock_traffic(&mut server, "o/r").await;
        let dir = tempfile::tempdir().unwrap();
        let cli = cli_for(server.url(), dir.path(), &["o/r"]);

        cli.execute().await.unwrap();

        let readme = std::fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert!(readme.starts_with("# GitHub Insights\n\n## o/r\n"));
        assert!(readme.contains("title \"Visitors for o/r\""));
        assert!(readme.contains("title \"Git Clones for o/r\""));
        assert!(readme.contains("| github.com | 9 | 4 |"));
        assert!(readme.contains("| 1 | o/r | 12 |"));

        let data = dir.path().join("data");
        for file in ["o_r_views.json", "o_r_clones.json", "o_r_referrals.json"] {
            assert!(data.join(file).exists(), "{file} should be written");
        }
        let partitions: Vec<_> = std::fs::read_dir(data.join("raw"))
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(partitions.len(), 1);
        assert!(partitions[0].join("o_r_referrals.json").exists());
    }

    #[tokio::test]
    async fn test_execute_skips_report_when_fetch_fails() {
        let mut server = mockito::Server::new_async().await;
        mock_traffic(&mut server, "o/r").await;
        server
            .mock("GET", "/repos/o/missing/traffic/views")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let cli = cli_for(server.url(), dir.path(), &["o/r", "o/missing"]);

        let err = cli.execute().await.unwrap_err();

        assert!(err.to_string().contains("404"));
        assert!(!dir.path().join("README.md").exists());
        assert!(dir.path().join("data/o_r_views.json").exists());
    }
}
