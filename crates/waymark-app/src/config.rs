#![forbid(unsafe_code)]

//! Process configuration from environment variables.
//!
//! | Variable            | Meaning                          | Default        |
//! |---------------------|----------------------------------|----------------|
//! | `WAYMARK_API_BASE`  | Base URL of the itinerary service | required       |
//! | `WAYMARK_API_TOKEN` | `Authorization` header value     | demo token     |
//! | `WAYMARK_LOG`       | `tracing` filter directive       | `warn`         |

use std::env;

use thiserror::Error;

const DEFAULT_TOKEN: &str = "Basic hS2sfS44wcl1sa2j";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Everything the binary needs before it can talk to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    pub api_token: String,
    pub log_filter: String,
}

/// Failure to assemble a [`Config`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("WAYMARK_API_BASE is not set; point it at the itinerary service, e.g. https://big-trip.example.com/big-trip")]
    MissingBase,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = env::var("WAYMARK_API_BASE").ok();
        let token = env::var("WAYMARK_API_TOKEN").ok();
        let filter = env::var("WAYMARK_LOG").ok();
        Self::resolve(base.as_deref(), token.as_deref(), filter.as_deref())
    }

    /// Assemble a configuration from raw variable values.
    ///
    /// Blank values count as unset.
    pub fn resolve(
        base: Option<&str>,
        token: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let api_base = non_blank(base).ok_or(ConfigError::MissingBase)?;
        let api_token = non_blank(token).unwrap_or_else(|| DEFAULT_TOKEN.to_string());
        let log_filter = non_blank(filter).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Ok(Self {
            api_base,
            api_token,
            log_filter,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_required() {
        let err = Config::resolve(None, None, None).unwrap_err();
        assert_eq!(err, ConfigError::MissingBase);
    }

    #[test]
    fn blank_base_counts_as_unset() {
        let err = Config::resolve(Some("   "), None, None).unwrap_err();
        assert_eq!(err, ConfigError::MissingBase);
    }

    #[test]
    fn token_and_filter_default() {
        let config = Config::resolve(Some("https://example.com/big-trip"), None, None).unwrap();
        assert_eq!(config.api_base, "https://example.com/big-trip");
        assert_eq!(config.api_token, DEFAULT_TOKEN);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn explicit_values_win() {
        let config = Config::resolve(
            Some("http://localhost:8080"),
            Some("Basic abc"),
            Some("waymark_model=debug"),
        )
        .unwrap();
        assert_eq!(config.api_token, "Basic abc");
        assert_eq!(config.log_filter, "waymark_model=debug");
    }
}
