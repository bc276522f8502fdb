//! Client for the hosted repository listing API.
//!
//! Two read-only calls are made per repository: the default branch lookup,
//! which yields the tree sha of the head commit, and the recursive tree
//! listing for that sha. Both share the same rate-limit handling.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tracing::{info, info_span, warn, Span};

use crate::config::ClientConfig;
use crate::error::{RepoTreeError, Result};
use crate::reference::RepositoryRef;
use crate::tree::{build_tree, RepoTree};

pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Entry type as reported by the listing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "blob")]
    File,
    #[serde(rename = "tree")]
    Directory,
    #[serde(rename = "commit")]
    Submodule,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PathEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl PathEntry {
    pub fn new(path: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// The recursive listing for one tree sha.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Listing {
    #[serde(default, rename = "tree")]
    pub entries: Vec<PathEntry>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Deserialize)]
struct BranchInfo {
    commit: BranchCommit,
}

#[derive(Deserialize)]
struct BranchCommit {
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    tree: TreeRef,
}

#[derive(Deserialize)]
struct TreeRef {
    sha: String,
}

/// Status, rate-limit reset and body of one HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub rate_limit_reset: Option<u64>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// A 403 or 429 carrying a reset timestamp. A plain 403 is a real refusal.
    pub fn reset_if_rate_limited(&self) -> Option<u64> {
        match self.status {
            403 | 429 => self.rate_limit_reset,
            _ => None,
        }
    }
}

pub trait Transport {
    fn get(&self, url: &str) -> Result<RawResponse>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| RepoTreeError::InvalidConfig("token is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<RawResponse> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let rate_limit_reset = response
            .headers()
            .get(RATE_LIMIT_RESET_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        let body = response.text()?;
        Ok(RawResponse {
            status,
            rate_limit_reset,
            body,
        })
    }
}

/// Wall clock and blocking sleep used while waiting out a rate limit.
pub trait Clock {
    fn now_epoch_secs(&self) -> u64;
    fn sleep(&self, duration: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

pub struct GitHubClient<T = HttpTransport, C = SystemClock> {
    transport: T,
    clock: C,
    config: ClientConfig,
    span: Span,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_parts(config, transport, SystemClock))
    }
}

impl<T: Transport, C: Clock> GitHubClient<T, C> {
    pub fn with_parts(config: ClientConfig, transport: T, clock: C) -> Self {
        let span = info_span!("repo_tree.api", api = %config.api_url);
        Self {
            transport,
            clock,
            config,
            span,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Tree sha of the head commit of the default branch.
    pub fn lookup_tree_sha(&self, repo: &RepositoryRef) -> Result<String> {
        let _enter = self.span.enter();
        let url = format!(
            "{}/repos/{}/{}/branches/{}",
            self.base_url(),
            repo.owner,
            repo.name,
            self.config.default_branch
        );
        let response = self.get_with_backoff(&url)?;
        if !response.is_success() {
            return Err(RepoTreeError::LookupFailed(response.status));
        }
        let info: BranchInfo = serde_json::from_str(&response.body)
            .map_err(|e| RepoTreeError::UnexpectedResponseShape(e.to_string()))?;
        Ok(info.commit.commit.tree.sha)
    }

    /// Full recursive listing below `tree_sha`.
    pub fn fetch_listing(&self, repo: &RepositoryRef, tree_sha: &str) -> Result<Listing> {
        let _enter = self.span.enter();
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.base_url(),
            repo.owner,
            repo.name,
            tree_sha
        );
        let response = self.get_with_backoff(&url)?;
        if !response.is_success() {
            return Err(RepoTreeError::ListingFailed(response.status));
        }
        let listing: Listing = serde_json::from_str(&response.body)
            .map_err(|e| RepoTreeError::UnexpectedResponseShape(e.to_string()))?;
        if listing.truncated {
            warn!(
                repo = %repo,
                entries = listing.entries.len(),
                "Tree listing was truncated by the server; output is incomplete"
            );
        }
        Ok(listing)
    }

    /// Resolves the default branch, fetches its listing and builds the tree.
    pub fn fetch_tree(&self, repo: &RepositoryRef) -> Result<RepoTree> {
        let sha = self.lookup_tree_sha(repo)?;
        info!(repo = %repo, sha = %sha, "Resolved default branch tree");
        let listing = self.fetch_listing(repo, &sha)?;
        info!(repo = %repo, entries = listing.entries.len(), "Fetched tree listing");
        build_tree(&repo.name, &listing.entries)
    }

    fn base_url(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }

    /// Sends `url`, sleeping until the reset time and resending while the
    /// server reports a rate limit.
    fn get_with_backoff(&self, url: &str) -> Result<RawResponse> {
        let mut waits = 0u32;
        loop {
            let response = self.transport.get(url)?;
            let Some(reset) = response.reset_if_rate_limited() else {
                return Ok(response);
            };
            if let Some(max) = self.config.max_rate_limit_waits {
                if waits >= max {
                    return Err(RepoTreeError::RateLimitExhausted(max));
                }
            }
            let sleep_secs = reset.saturating_sub(self.clock.now_epoch_secs());
            info!(url, "Rate limited. Sleeping for {} seconds.", sleep_secs);
            self.clock.sleep(Duration::from_secs(sleep_secs));
            waits += 1;
        }
    }
}
