//! App Configuration
//!
//! Layered: built-in defaults → build-time env → `window.__MILESTONE_CONFIG__`.
//!
//! ```js
//! window.__MILESTONE_CONFIG__ = {
//!   project_id: "1234",
//!   fallback_origin: "https://api.example.com",
//!   request_timeout_ms: 7000,
//!   log_level: "debug",
//!   reseed: true
//! };
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

pub const DEFAULT_PROJECT_ID: &str = "1234";
pub const DEFAULT_FALLBACK_ORIGIN: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_MS: u64 = 7_000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Name of the optional global config object
const WINDOW_CONFIG_KEY: &str = "__MILESTONE_CONFIG__";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Project whose milestones are shown
    pub project_id: String,
    /// Origin tried first; normally the page's own origin
    pub api_base: String,
    /// Origin retried after a routing miss
    pub fallback_origin: String,
    pub request_timeout_ms: u64,
    pub log_level: String,
    /// Forget the demo seeded marker at startup so a loopback host seeds again
    pub reseed: bool,
}

impl AppConfig {
    pub fn with_origin(page_origin: impl Into<String>) -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            api_base: page_origin.into(),
            fallback_origin: DEFAULT_FALLBACK_ORIGIN.to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            reseed: false,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Later layers win; blank strings and zero timeouts are ignored
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        fn non_blank(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        }

        if let Some(v) = non_blank(overrides.project_id) {
            self.project_id = v;
        }
        if let Some(v) = non_blank(overrides.api_base) {
            self.api_base = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = non_blank(overrides.fallback_origin) {
            self.fallback_origin = v.trim_end_matches('/').to_string();
        }
        if let Some(ms) = overrides.request_timeout_ms.filter(|ms| *ms > 0) {
            self.request_timeout_ms = ms;
        }
        if let Some(v) = non_blank(overrides.log_level) {
            self.log_level = v;
        }
        if let Some(reseed) = overrides.reseed {
            self.reseed = reseed;
        }
    }
}

/// Partial config from one layer
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigOverrides {
    pub project_id: Option<String>,
    pub api_base: Option<String>,
    pub fallback_origin: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub log_level: Option<String>,
    pub reseed: Option<bool>,
}

impl ConfigOverrides {
    pub fn from_build_env() -> Self {
        Self {
            project_id: option_env!("MILESTONE_PROJECT_ID").map(str::to_string),
            api_base: option_env!("MILESTONE_API_BASE").map(str::to_string),
            fallback_origin: option_env!("MILESTONE_FALLBACK_ORIGIN").map(str::to_string),
            request_timeout_ms: option_env!("MILESTONE_TIMEOUT_MS").and_then(|v| v.parse().ok()),
            log_level: option_env!("MILESTONE_LOG_LEVEL").map(str::to_string),
            reseed: option_env!("MILESTONE_RESEED").map(|v| v == "1" || v.eq_ignore_ascii_case("true")),
        }
    }

    pub fn from_js(value: JsValue) -> Result<Option<Self>, String> {
        if value.is_undefined() || value.is_null() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(value)
            .map(Some)
            .map_err(|e| format!("invalid {WINDOW_CONFIG_KEY}: {e}"))
    }
}

/// Resolve the config for this page.
///
/// Returns a problem description when the runtime object was present but
/// unusable; logging is not up yet at this point.
pub fn load() -> (AppConfig, Option<String>) {
    let window = web_sys::window();
    let origin = window
        .as_ref()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| DEFAULT_FALLBACK_ORIGIN.to_string());

    let mut config = AppConfig::with_origin(origin);
    config.apply(ConfigOverrides::from_build_env());

    let runtime = window
        .map(|w| js_sys::Reflect::get(&w, &JsValue::from_str(WINDOW_CONFIG_KEY)).unwrap_or(JsValue::UNDEFINED))
        .map(ConfigOverrides::from_js)
        .unwrap_or(Ok(None));

    match runtime {
        Ok(Some(overrides)) => {
            config.apply(overrides);
            (config, None)
        }
        Ok(None) => (config, None),
        Err(problem) => (config, Some(problem)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::with_origin("http://localhost:3000");
        assert_eq!(config.project_id, "1234");
        assert_eq!(config.fallback_origin, "http://127.0.0.1:5000");
        assert_eq!(config.request_timeout(), Duration::from_secs(7));
        assert_eq!(config.api_base, "http://localhost:3000");
        assert!(!config.reseed);
    }

    #[test]
    fn test_overrides_win_and_are_normalized() {
        let mut config = AppConfig::with_origin("http://localhost:3000");
        config.apply(ConfigOverrides {
            project_id: Some("alpha".into()),
            fallback_origin: Some("https://api.example.com/".into()),
            request_timeout_ms: Some(2_500),
            ..Default::default()
        });
        assert_eq!(config.project_id, "alpha");
        assert_eq!(config.fallback_origin, "https://api.example.com");
        assert_eq!(config.request_timeout(), Duration::from_millis(2_500));
        assert_eq!(config.log_level, "info");
        assert!(!config.reseed);

        config.apply(ConfigOverrides { reseed: Some(true), ..Default::default() });
        assert!(config.reseed);
    }

    #[test]
    fn test_blank_and_zero_values_are_ignored() {
        let mut config = AppConfig::with_origin("http://localhost:3000");
        config.apply(ConfigOverrides {
            project_id: Some("   ".into()),
            request_timeout_ms: Some(0),
            ..Default::default()
        });
        assert_eq!(config, AppConfig::with_origin("http://localhost:3000"));
    }
}
