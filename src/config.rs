use url::Url;

use crate::error::{Error, Result};

pub const SEARCH_URL_VAR: &str = "PUBMED_API_URL";
pub const SUMMARY_URL_VAR: &str = "PUBMED_SUMMARY_URL";
pub const FETCH_URL_VAR: &str = "PUBMED_FETCH_URL";

/// Endpoint locations, read once at startup and handed to whoever talks to the network.
#[derive(Debug, Clone)]
pub struct Config {
    pub search_url: Url,
    /// Reserved for the summary endpoint; nothing calls it yet.
    pub summary_url: Option<Url>,
    pub fetch_url: Url,
}

impl Config {
    /// Load from the process environment, after pulling in `.env` if there is one.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| -> Result<Option<Url>> {
            match lookup(name).filter(|v| !v.trim().is_empty()) {
                Some(raw) => Url::parse(raw.trim())
                    .map(Some)
                    .map_err(|source| Error::InvalidConfig { name, source }),
                None => Ok(None),
            }
        };

        Ok(Config {
            search_url: read(SEARCH_URL_VAR)?.ok_or(Error::MissingConfig(SEARCH_URL_VAR))?,
            summary_url: read(SUMMARY_URL_VAR)?,
            fetch_url: read(FETCH_URL_VAR)?.ok_or(Error::MissingConfig(FETCH_URL_VAR))?,
        })
    }
}
