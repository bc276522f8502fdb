use std::fmt;

use reqwest::Url;

use crate::error::{RepoTreeError, Result};

pub const DEFAULT_WEB_HOST: &str = "github.com";

/// An `owner/name` pair identifying a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Resolves user input into a repository reference.
///
/// Input mentioning `web_host` is parsed as a URL and the first two path
/// segments are taken; anything else must be exactly `owner/name`.
pub fn resolve(input: &str, web_host: &str) -> Result<RepositoryRef> {
    let input = input.trim();
    if input.is_empty() {
        return Err(RepoTreeError::MalformedReference(input.to_string()));
    }
    if !web_host.is_empty() && input.contains(web_host) {
        parse_web_url(input)
    } else {
        parse_bare(input)
    }
}

fn parse_web_url(input: &str) -> Result<RepositoryRef> {
    let malformed = || RepoTreeError::MalformedReference(input.to_string());

    let url = if input.contains("://") {
        Url::parse(input)
    } else {
        Url::parse(&format!("https://{}", input))
    }
    .map_err(|_| malformed())?;

    let segments: Vec<&str> = url
        .path()
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    if segments.len() < 2 {
        return Err(malformed());
    }

    let name = segments[1].strip_suffix(".git").unwrap_or(segments[1]);
    if name.is_empty() {
        return Err(malformed());
    }
    Ok(RepositoryRef {
        owner: segments[0].to_string(),
        name: name.to_string(),
    })
}

fn parse_bare(input: &str) -> Result<RepositoryRef> {
    match input.split('/').collect::<Vec<_>>().as_slice() {
        [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(RepositoryRef {
            owner: owner.to_string(),
            name: name.to_string(),
        }),
        _ => Err(RepoTreeError::MalformedReference(input.to_string())),
    }
}
