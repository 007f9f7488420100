// src/config/source.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const ENV_CONFIG_PATH: &str = "STANDINGS_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/standings.toml";

pub const DEFAULT_API_BASE: &str = "https://olympic-sports-api.p.rapidapi.com";
pub const DEFAULT_API_HOST: &str = "olympic-sports-api.p.rapidapi.com";
pub const DEFAULT_API_ENDPOINT: &str = "/medals/countries";
pub const DEFAULT_YEAR: &str = "2024";
pub const DEFAULT_PAGE_URL: &str = "https://www.olympics.com/en/milano-cortina-2026/medals";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Which adapter feeds the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Api,
    Html,
}

impl SourceKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" | "json" | "rapidapi" => Some(SourceKind::Api),
            "html" | "scrape" | "page" => Some(SourceKind::Html),
            _ => None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_connect_timeout_secs() -> u64 {
    4
}
fn default_cache_ttl_secs() -> u64 {
    3600
}
fn default_fallback_ttl_secs() -> u64 {
    60
}

/// Deployment configuration of the standings source.
///
/// Precedence: built-in defaults < TOML file < environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub source: SourceKind,
    pub api_base: String,
    pub api_host: String,
    pub api_endpoint: String,
    pub year: String,
    /// Never read from the TOML file; `RAPIDAPI_KEY` only.
    #[serde(skip)]
    pub api_key: Option<String>,
    pub page_url: String,
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_fallback_ttl_secs")]
    pub fallback_ttl_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            year: DEFAULT_YEAR.to_string(),
            api_key: None,
            page_url: DEFAULT_PAGE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            fallback_ttl_secs: default_fallback_ttl_secs(),
        }
    }
}

impl SourceConfig {
    /// Load using env var + fallbacks:
    /// 1) $STANDINGS_CONFIG_PATH (must exist when set)
    /// 2) config/standings.toml
    /// 3) built-in defaults
    ///
    /// Environment overrides are applied on top in every case.
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    bail!("{ENV_CONFIG_PATH} points to non-existent path");
                }
                Self::load_from_file(&pb)?
            }
            Err(_) => {
                let pb = PathBuf::from(DEFAULT_CONFIG_PATH);
                if pb.exists() {
                    Self::load_from_file(&pb)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env()?;
        Ok(cfg)
    }

    /// Parse a TOML file; missing keys keep their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading standings config from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("parsing standings config {}", path.display()))
    }

    /// Overlay environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(v) = env_nonempty("STANDINGS_SOURCE") {
            self.source = SourceKind::parse(&v)
                .ok_or_else(|| anyhow!("STANDINGS_SOURCE must be 'api' or 'html', got '{v}'"))?;
        }
        self.api_key = env_nonempty("RAPIDAPI_KEY");
        if let Some(v) = env_nonempty("RAPIDAPI_HOST") {
            self.api_host = v;
        }
        if let Some(v) = env_nonempty("STANDINGS_API_BASE") {
            self.api_base = v;
        }
        if let Some(v) = env_nonempty("STANDINGS_YEAR") {
            self.year = v;
        }
        if let Some(v) = env_nonempty("STANDINGS_PAGE_URL") {
            self.page_url = v;
        }
        if let Some(v) = env_secs("STANDINGS_TIMEOUT_SECS")? {
            self.timeout_secs = v;
        }
        if let Some(v) = env_secs("STANDINGS_CACHE_TTL_SECS")? {
            self.cache_ttl_secs = v;
        }
        if let Some(v) = env_secs("STANDINGS_FALLBACK_TTL_SECS")? {
            self.fallback_ttl_secs = v;
        }
        Ok(())
    }

    /// Full URL of the medals endpoint, including the year query.
    pub fn api_url(&self) -> String {
        format!(
            "{}{}?year={}",
            self.api_base.trim_end_matches('/'),
            self.api_endpoint,
            self.year
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn fallback_ttl(&self) -> Duration {
        Duration::from_secs(self.fallback_ttl_secs.min(self.cache_ttl_secs))
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_secs(key: &str) -> Result<Option<u64>> {
    env_nonempty(key)
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| anyhow!("{key} must be a whole number of seconds, got '{v}'"))
        })
        .transpose()
}
