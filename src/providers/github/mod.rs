mod client;

pub use client::GitHubClient;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
