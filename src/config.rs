//! Runtime settings, read from `REVEX_*` environment variables and
//! overridable from the command line.

use crate::error::{Result, RevexError};
use crate::selectors::NEXT_PAGE_SELECTOR;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub bind: String,
    /// `0` disables the page limit.
    pub max_pages: usize,
    pub next_selector: String,
    pub initial_settle_ms: u64,
    pub click_settle_ms: u64,
    pub navigation_timeout_ms: u64,
    pub user_agent: String,
    pub chrome_path: Option<String>,
    pub model_url: Option<String>,
    #[serde(skip_serializing)]
    pub model_token: Option<String>,
    pub html_budget_chars: usize,
    pub max_output_tokens: usize,
    pub generation_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".into(),
            max_pages: 50,
            next_selector: NEXT_PAGE_SELECTOR.into(),
            initial_settle_ms: 5_000,
            click_settle_ms: 3_000,
            navigation_timeout_ms: 30_000,
            user_agent: DEFAULT_USER_AGENT.into(),
            chrome_path: None,
            model_url: None,
            model_token: None,
            html_budget_chars: 1_000,
            max_output_tokens: 150,
            generation_timeout_ms: 30_000,
        }
    }
}

impl Settings {
    /// Load settings from the environment, falling back to defaults for
    /// anything unset. Malformed numbers are an error, not a silent default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        Ok(Self {
            bind: lookup("REVEX_BIND").unwrap_or(d.bind),
            max_pages: parse_or(&lookup, "REVEX_MAX_PAGES", d.max_pages)?,
            next_selector: lookup("REVEX_NEXT_SELECTOR").unwrap_or(d.next_selector),
            initial_settle_ms: parse_or(&lookup, "REVEX_INITIAL_SETTLE_MS", d.initial_settle_ms)?,
            click_settle_ms: parse_or(&lookup, "REVEX_CLICK_SETTLE_MS", d.click_settle_ms)?,
            navigation_timeout_ms: parse_or(
                &lookup,
                "REVEX_NAV_TIMEOUT_MS",
                d.navigation_timeout_ms,
            )?,
            user_agent: lookup("REVEX_USER_AGENT").unwrap_or(d.user_agent),
            chrome_path: non_empty(lookup("REVEX_CHROME_PATH")),
            model_url: non_empty(lookup("REVEX_MODEL_URL")),
            model_token: non_empty(lookup("REVEX_MODEL_TOKEN")),
            html_budget_chars: parse_or(&lookup, "REVEX_HTML_BUDGET", d.html_budget_chars)?,
            max_output_tokens: parse_or(
                &lookup,
                "REVEX_MAX_OUTPUT_TOKENS",
                d.max_output_tokens,
            )?,
            generation_timeout_ms: parse_or(
                &lookup,
                "REVEX_GENERATION_TIMEOUT_MS",
                d.generation_timeout_ms,
            )?,
        })
    }

    pub fn max_pages(&self) -> Option<usize> {
        (self.max_pages > 0).then_some(self.max_pages)
    }

    pub fn initial_settle(&self) -> Duration {
        Duration::from_millis(self.initial_settle_ms)
    }

    pub fn click_settle(&self) -> Duration {
        Duration::from_millis(self.click_settle_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.generation_timeout_ms)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| RevexError::Config(format!("{key}={raw} is not a valid number"))),
        _ => Ok(default),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
