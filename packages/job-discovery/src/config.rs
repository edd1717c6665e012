use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::debounce::DEFAULT_SEARCH_DEBOUNCE;
use crate::pagination::{DEFAULT_PAGE_SIZE, DEFAULT_WINDOW_SIZE};

/// Job board client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub api_url: String,
    /// Public site the shareable listing links point at.
    pub site_url: String,
    pub page_size: u32,
    pub page_window: u32,
    pub search_debounce: Duration,
    pub handoff_delay: Duration,
    pub request_timeout: Duration,
    pub auth_token: Option<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            site_url: "http://localhost:3000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page_window: DEFAULT_WINDOW_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            handoff_delay: Duration::from_millis(1500),
            request_timeout: Duration::from_secs(30),
            auth_token: None,
        }
    }
}

impl BoardConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();
        let config = Self {
            api_url: env::var("JOBBOARD_API_URL").unwrap_or(defaults.api_url),
            site_url: env::var("JOBBOARD_SITE_URL").unwrap_or(defaults.site_url),
            page_size: parse_var("JOBBOARD_PAGE_SIZE", defaults.page_size)?,
            page_window: parse_var("JOBBOARD_PAGE_WINDOW", defaults.page_window)?,
            search_debounce: Duration::from_millis(parse_var(
                "JOBBOARD_SEARCH_DEBOUNCE_MS",
                defaults.search_debounce.as_millis() as u64,
            )?),
            handoff_delay: Duration::from_millis(parse_var(
                "JOBBOARD_HANDOFF_DELAY_MS",
                defaults.handoff_delay.as_millis() as u64,
            )?),
            request_timeout: Duration::from_secs(parse_var(
                "JOBBOARD_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            auth_token: env::var("JOBBOARD_AUTH_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("JOBBOARD_PAGE_SIZE must be greater than zero");
        }
        if self.page_window == 0 {
            bail!("JOBBOARD_PAGE_WINDOW must be greater than zero");
        }
        url::Url::parse(&self.site_url).context("JOBBOARD_SITE_URL must be a valid URL")?;
        Ok(())
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}
