//! Diagnostic logging setup.
//!
//! Logs go to stderr so the rendered tree is the only thing on stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::error::{RepoTreeError, Result};

pub fn init_logging(level: &str) -> Result<()> {
    let filter = build_env_filter(level)?;
    Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| RepoTreeError::InvalidConfig(format!("Failed to install logger: {}", e)))
}

fn build_env_filter(level: &str) -> Result<EnvFilter> {
    let level = level.trim();
    if level.is_empty() {
        return Ok(EnvFilter::new("info"));
    }
    EnvFilter::try_new(level)
        .map_err(|e| RepoTreeError::InvalidConfig(format!("Invalid log directive: {}", e)))
}
