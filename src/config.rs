//! Command-line and environment configuration.

use std::time::Duration;

use clap::Parser;

use crate::reference::DEFAULT_WEB_HOST;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "master";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Print the file layout of a hosted repository as a tree.
#[derive(Debug, Clone, Parser)]
#[command(name = "repo-tree", version)]
pub struct Args {
    /// Repository as `owner/repo` or a repository URL; prompts when omitted
    pub repo: Option<String>,

    /// Base URL of the listing API
    #[arg(long, env = "REPO_TREE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Host name that marks input as a web URL
    #[arg(long, env = "REPO_TREE_WEB_HOST", default_value = DEFAULT_WEB_HOST)]
    pub web_host: String,

    /// Name of the default branch to resolve
    #[arg(long, env = "REPO_TREE_DEFAULT_BRANCH", default_value = DEFAULT_BRANCH)]
    pub default_branch: String,

    /// Optional API token; only raises the rate limit
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Give up after this many rate-limit waits (unbounded when omitted)
    #[arg(long, env = "REPO_TREE_MAX_RATE_LIMIT_WAITS")]
    pub max_rate_limit_waits: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, env = "REPO_TREE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Log filter directive (trace, debug, info, warn, error, off)
    #[arg(long, env = "REPO_TREE_LOG", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            default_branch: self.default_branch.clone(),
            token: self.token.clone().filter(|t| !t.is_empty()),
            max_rate_limit_waits: self.max_rate_limit_waits,
            timeout: Duration::from_secs(self.timeout_secs),
            ..ClientConfig::default()
        }
    }
}

/// Settings for [`crate::api::GitHubClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub default_branch: String,
    pub token: Option<String>,
    pub user_agent: String,
    pub max_rate_limit_waits: Option<u32>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            default_branch: DEFAULT_BRANCH.to_string(),
            token: None,
            user_agent: concat!("repo-tree/", env!("CARGO_PKG_VERSION")).to_string(),
            max_rate_limit_waits: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_client_config() {
        let args = Args::try_parse_from([
            "repo-tree",
            "octo/demo",
            "--api-url",
            "https://git.example.org/api/v3",
            "--default-branch",
            "main",
            "--max-rate-limit-waits",
            "3",
            "--timeout-secs",
            "5",
        ])
        .unwrap();

        assert_eq!(args.repo.as_deref(), Some("octo/demo"));
        let config = args.client_config();
        assert_eq!(config.api_url, "https://git.example.org/api/v3");
        assert_eq!(config.default_branch, "main");
        assert_eq!(config.max_rate_limit_waits, Some(3));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn empty_token_is_ignored() {
        let args = Args::try_parse_from(["repo-tree", "--token", ""]).unwrap();
        assert_eq!(args.client_config().token, None);
    }
}
