//! Runtime configuration.
//!
//! Defaults are baked in at compile time from `PROFILE_*` environment
//! variables. A JSON `<script id="app-config">` block in the host page may
//! override any subset of them at startup.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

pub const CONFIG_ELEMENT_ID: &str = "app-config";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_scheme: String,
    pub backend_host: String,
    pub frontend_scheme: String,
    pub frontend_host: String,
    pub log_level: String,
}

fn env_or(value: Option<&str>, fallback: &str) -> String {
    value.unwrap_or(fallback).to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_scheme: env_or(option_env!("PROFILE_BACKEND_SCHEME"), "http"),
            backend_host: env_or(option_env!("PROFILE_BACKEND_HOST"), "localhost:8080"),
            frontend_scheme: env_or(option_env!("PROFILE_FRONTEND_SCHEME"), "http"),
            frontend_host: env_or(option_env!("PROFILE_FRONTEND_HOST"), "localhost:3000"),
            log_level: env_or(option_env!("PROFILE_LOG_LEVEL"), "info"),
        }
    }
}

/// Partial config as found in the host page; absent keys keep the defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    backend_scheme: Option<String>,
    backend_host: Option<String>,
    frontend_scheme: Option<String>,
    frontend_host: Option<String>,
    log_level: Option<String>,
}

impl AppConfig {
    /// Applies a JSON object of overrides on top of `self`.
    pub fn with_overrides(mut self, raw: &str) -> Result<Self, AppError> {
        let o: ConfigOverrides =
            serde_json::from_str(raw).map_err(|e| AppError::Config(e.to_string()))?;
        if let Some(v) = o.backend_scheme {
            self.backend_scheme = v;
        }
        if let Some(v) = o.backend_host {
            self.backend_host = v;
        }
        if let Some(v) = o.frontend_scheme {
            self.frontend_scheme = v;
        }
        if let Some(v) = o.frontend_host {
            self.frontend_host = v;
        }
        if let Some(v) = o.log_level {
            self.log_level = v;
        }
        Ok(self)
    }

    /// Loads the defaults and applies the page's config block, if any.
    /// A malformed block is logged and ignored.
    pub fn load() -> Self {
        let defaults = Self::default();
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());
        match raw {
            Some(raw) if !raw.trim().is_empty() => match defaults.clone().with_overrides(&raw) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
                    defaults
                }
            },
            _ => defaults,
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// `{scheme}://{host}/api/v1/{path}`
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}://{}/api/v1/{}",
            self.backend_scheme,
            self.backend_host,
            path.trim_start_matches('/')
        )
    }

    /// Canonical shareable URL of a stored profile.
    pub fn share_url(&self, id: &str) -> String {
        format!("{}://{}/profile/{}", self.frontend_scheme, self.frontend_host, id)
    }
}
