//! Configuration loaded from the environment.

use std::env;

use thiserror::Error;

use crate::query::PageSizes;

pub const INITIAL_PAGE_SIZE_VAR: &str = "LISTINGS_INITIAL_PAGE_SIZE";
pub const NEXT_PAGE_SIZE_VAR: &str = "LISTINGS_NEXT_PAGE_SIZE";
pub const PREVIEW_PAGE_SIZE_VAR: &str = "LISTINGS_PREVIEW_PAGE_SIZE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    ZeroPageSize(&'static str),
}

/// Page sizes used by the browsing views and the home feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingsConfig {
    /// Records requested for the first page of a view.
    pub initial_page_size: usize,
    /// Records requested for each "load more".
    pub next_page_size: usize,
    /// Records shown in the home page's rent and sale previews.
    pub preview_page_size: usize,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            initial_page_size: 8,
            next_page_size: 4,
            preview_page_size: 4,
        }
    }
}

impl ListingsConfig {
    /// Load from environment variables, falling back to the defaults for
    /// anything unset. A `.env` file is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            initial_page_size: read_size(&lookup, INITIAL_PAGE_SIZE_VAR, defaults.initial_page_size)?,
            next_page_size: read_size(&lookup, NEXT_PAGE_SIZE_VAR, defaults.next_page_size)?,
            preview_page_size: read_size(&lookup, PREVIEW_PAGE_SIZE_VAR, defaults.preview_page_size)?,
        };

        tracing::debug!(
            initial = config.initial_page_size,
            next = config.next_page_size,
            preview = config.preview_page_size,
            "loaded listings config"
        );

        Ok(config)
    }

    pub fn page_sizes(&self) -> PageSizes {
        PageSizes::new(self.initial_page_size, self.next_page_size)
    }
}

fn read_size<F>(lookup: &F, var: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };

    let size: usize = raw.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value: raw.clone(),
    })?;

    if size == 0 {
        return Err(ConfigError::ZeroPageSize(var));
    }
    Ok(size)
}
