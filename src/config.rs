//! Configuration for the Second Brain client.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (BRAIN_HOME, BRAIN_API_URL, BRAIN_SHARE_URL)
//! 2. Config file (.brain/config.yaml)
//! 3. Defaults (~/.second-brain, http://localhost:3000/api/v1)
//!
//! Config file discovery:
//! - Searches current directory and parents for .brain/config.yaml
//! - `paths.home` in the config file is relative to the .brain/ directory

pub mod paths;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";
pub const DEFAULT_SHARE_URL: &str = "http://localhost:5173";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub api: Option<ApiConfig>,
    #[serde(default)]
    pub share: Option<ShareConfig>,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareConfig {
    /// Origin of the web app that serves /shared/<hash>
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Client state directory (relative to .brain/)
    pub home: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to client state (session token, theme)
    pub home: PathBuf,
    /// Backend base URL
    pub api_url: String,
    /// Web app origin used to build public share links
    pub share_base_url: String,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// HTTP settings
    pub http: HttpSettings,
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout_seconds: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ResolvedConfig {
    /// Public link for a share hash
    pub fn share_url(&self, hash: &str) -> String {
        format!("{}/shared/{}", self.share_base_url.trim_end_matches('/'), hash)
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".brain").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge environment, config file and defaults
fn resolve(
    config_file: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let parsed = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };

    let home = match env("BRAIN_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let from_file = parsed
                .as_ref()
                .and_then(|c| c.paths.home.as_deref())
                .zip(config_file.as_deref().and_then(Path::parent));

            match from_file {
                Some((home, brain_dir)) => resolve_path(brain_dir, home),
                None => dirs::home_dir()
                    .context("Failed to determine home directory")?
                    .join(".second-brain"),
            }
        }
    };

    let api = parsed.as_ref().and_then(|c| c.api.as_ref());

    let api_url = env("BRAIN_API_URL")
        .or_else(|| api.and_then(|a| a.base_url.clone()))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let share_base_url = env("BRAIN_SHARE_URL")
        .or_else(|| {
            parsed
                .as_ref()
                .and_then(|c| c.share.as_ref())
                .and_then(|s| s.base_url.clone())
        })
        .unwrap_or_else(|| DEFAULT_SHARE_URL.to_string());

    let http = HttpSettings {
        timeout_seconds: api
            .and_then(|a| a.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
    };

    Ok(ResolvedConfig {
        home,
        api_url,
        share_base_url,
        config_file,
        http,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    resolve(find_config_file(), |key| std::env::var(key).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Get the client state directory
pub fn brain_home() -> Result<PathBuf> {
    Ok(config()?.home.clone())
}
