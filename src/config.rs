use std::path::PathBuf;
use url::Url;

use crate::auth::Token;
use crate::error::{InsightsError, Result};

/// Validated settings for one insights run.
#[derive(Debug)]
pub struct Config {
    pub token: Token,
    pub repositories: Vec<String>,
    pub api_url: Url,
    pub output_dir: PathBuf,
    pub top: usize,
    pub isolate_failures: bool,
}

impl Config {
    pub fn new(
        token: Option<&str>,
        repositories: &[String],
        api_url: &str,
        output_dir: PathBuf,
        top: usize,
        isolate_failures: bool,
    ) -> Result<Self> {
        let token = token.map(Token::from).filter(|t| !t.is_empty());
        let repositories: Vec<String> = repositories
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();

        let (Some(token), false) = (token, repositories.is_empty()) else {
            return Err(InsightsError::Config(
                "Both 'pat-token' and 'repos' must be provided.".to_string(),
            ));
        };

        for repository in &repositories {
            validate_repository(repository)?;
        }

        let api_url = Url::parse(api_url)
            .map_err(|e| InsightsError::Config(format!("Invalid API URL '{api_url}': {e}")))?;

        Ok(Self {
            token,
            repositories,
            api_url,
            output_dir,
            top,
            isolate_failures,
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.output_dir.join("data")
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join("README.md")
    }
}

fn validate_repository(repository: &str) -> Result<()> {
    let mut parts = repository.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(()),
        _ => Err(InsightsError::Config(format!(
            "Repository '{repository}' must look like 'owner/name'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::github::DEFAULT_API_URL;

    fn repos(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    fn build(token: Option<&str>, repositories: &[String]) -> Result<Config> {
        Config::new(
            token,
            repositories,
            DEFAULT_API_URL,
            PathBuf::from("insights"),
            10,
            false,
        )
    }

    #[test]
    fn test_valid_config_trims_repositories() {
        let config = build(Some("ghp_abc"), &repos(&[" octo/one", "octo/two ", ""])).unwrap();

        assert_eq!(config.repositories, repos(&["octo/one", "octo/two"]));
        assert_eq!(config.token.as_str(), "ghp_abc");
        assert_eq!(config.report_path(), PathBuf::from("insights/README.md"));
        assert_eq!(config.data_dir(), PathBuf::from("insights/data"));
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let err = build(None, &repos(&["octo/one"])).unwrap_err();

        assert!(matches!(err, InsightsError::Config(_)));
    }

    #[test]
    fn test_blank_token_is_config_error() {
        let err = build(Some("   "), &repos(&["octo/one"])).unwrap_err();

        assert!(matches!(err, InsightsError::Config(_)));
    }

    #[test]
    fn test_missing_repositories_is_config_error() {
        let err = build(Some("ghp_abc"), &repos(&["", " "])).unwrap_err();

        assert!(matches!(err, InsightsError::Config(_)));
    }

    #[test]
    fn test_malformed_repository_is_rejected() {
        for bad in ["octo", "octo/", "/demo", "a/b/c"] {
            let err = build(Some("ghp_abc"), &repos(&[bad])).unwrap_err();
            assert!(err.to_string().contains(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_invalid_api_url_is_rejected() {
        let err = Config::new(
            Some("ghp_abc"),
            &repos(&["octo/one"]),
            "not a url",
            PathBuf::from("out"),
            10,
            false,
        )
        .unwrap_err();

        assert!(err.to_string().contains("Invalid API URL"));
    }

    #[test]
    fn test_token_is_redacted_in_debug() {
        let config = build(Some("ghp_secret"), &repos(&["octo/one"])).unwrap();

        assert!(!format!("{config:?}").contains("ghp_secret"));
    }
}
