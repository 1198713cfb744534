use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

/// Environment variable holding the Visual Crossing key (also read from `.env`).
pub const API_KEY_ENV: &str = "API_KEY";

/// Credentials for a keyed provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [visual_crossing]
/// api_key = "..."
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_crossing: Option<ProviderConfig>,
}

impl Config {
    /// Load config from the platform config dir, or an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "asciisky", "asciisky")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.visual_crossing = Some(ProviderConfig { api_key });
    }

    /// Returns the stored Visual Crossing key, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.visual_crossing
            .as_ref()
            .map(|cfg| cfg.api_key.as_str())
    }
}

/// Where a resolved API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Flag,
    Env,
    ConfigFile,
}

impl fmt::Display for ApiKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ApiKeySource::Flag => "--api-key",
            ApiKeySource::Env => API_KEY_ENV,
            ApiKeySource::ConfigFile => "config file",
        })
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    value: String,
    source: ApiKeySource,
}

impl ApiKey {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> ApiKeySource {
        self.source
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Pick the first non-blank key: command line, then environment, then config file.
///
/// `config` is only called when neither the flag nor the environment has a key.
pub fn resolve_api_key(
    flag: Option<&str>,
    env: Option<&str>,
    config: impl FnOnce() -> Result<Config>,
) -> Result<Option<ApiKey>> {
    let pick = |value: Option<&str>, source| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| ApiKey {
                value: v.to_string(),
                source,
            })
    };

    if let Some(key) = pick(flag, ApiKeySource::Flag) {
        return Ok(Some(key));
    }
    if let Some(key) = pick(env, ApiKeySource::Env) {
        return Ok(Some(key));
    }

    let config = config()?;
    Ok(pick(config.api_key(), ApiKeySource::ConfigFile))
}
