pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod reference;
pub mod tree;

pub use error::{RepoTreeError, Result};
