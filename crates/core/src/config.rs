use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key).as_deref() {
        Some("1") | Some("true") | Some("yes") => true,
        Some("0") | Some("false") | Some("no") => false,
        _ => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub remote: RemoteConfig,
    pub import: ImportConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `RULEPORT_PROFILE` env var. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("RULEPORT_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            remote: RemoteConfig::from_env_profiled(p),
            import: ImportConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  remote:      url={}, token={}, timeout={}s",
            self.remote.base_url,
            if self.remote.api_token.is_some() { "set" } else { "(none)" },
            self.remote.timeout_secs
        );
        tracing::info!(
            "  import:      categories=[{}], default_enabled={}",
            self.import.alert_categories.join(","),
            self.import.default_enabled
        );
    }

    /// Return a redacted view safe for printing (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "remote": {
                "base_url": self.remote.base_url,
                "timeout_secs": self.remote.timeout_secs,
                "authenticated": self.remote.api_token.is_some(),
            },
            "import": {
                "alert_categories": self.import.alert_categories,
                "default_enabled": self.import.default_enabled,
            },
        })
    }
}

// ── Remote rule service ───────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl RemoteConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            base_url: profiled_env_or(p, "RULEPORT_URL", "http://localhost:17000"),
            api_token: profiled_env_opt(p, "RULEPORT_TOKEN"),
            timeout_secs: profiled_env_u64(p, "RULEPORT_TIMEOUT_SECS", 30),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ── Import defaults ───────────────────────────────────────────

/// Datasource categories that support alert rules when no catalog
/// is configured.
pub const DEFAULT_ALERT_CATEGORIES: &[&str] = &[
    "prometheus",
    "elasticsearch",
    "loki",
    "tdengine",
    "ck",
    "mysql",
    "pgsql",
    "aliyun-sls",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Datasource categories accepted as an import target.
    pub alert_categories: Vec<String>,
    /// Enabled state applied when the caller does not choose one.
    pub default_enabled: bool,
}

impl ImportConfig {
    fn from_env_profiled(p: &str) -> Self {
        let alert_categories = match profiled_env_opt(p, "RULEPORT_ALERT_CATEGORIES") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_ALERT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        };
        Self {
            alert_categories,
            default_enabled: profiled_env_bool(p, "RULEPORT_DEFAULT_ENABLED", false),
        }
    }
}
