//! Simple CLI configuration loader for gradebook
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./gradebook.json or ./.gradebook/config.json
//! 3. User config directory: <config_dir>/gradebook/config.json
//! 4. Environment variables only (no files)

use anyhow::{anyhow, Context, Result};
use gradebook_core::config::{DEFAULT_APP_BASE, DEFAULT_BASE_URL};
use gradebook_core::ResolvedApiConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Raw configuration file format (simple single-file schema)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    /// Base URL of the records server
    pub base_url: Option<String>,
    /// Base path the page router is rooted at
    pub app_base: Option<String>,
    /// Extra headers; a value can be "env:VAR_NAME" for an environment variable
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// CLI configuration loader
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Directory searched in place of the current one
    search_root: Option<PathBuf>,
    /// Directory searched in place of the user config directory
    config_home: Option<PathBuf>,
    /// Flag overrides
    base_url_override: Option<String>,
    app_base_override: Option<String>,
    header_overrides: HashMap<String, String>,
    timeout_override: Option<u64>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            config_override: None,
            search_root: None,
            config_home: None,
            base_url_override: None,
            app_base_override: None,
            header_overrides: HashMap::new(),
            timeout_override: None,
        }
    }

    /// Set config file/directory override; `~` and variables are expanded
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        let raw = path.to_string_lossy().into_owned();
        let expanded = shellexpand::full(&raw)
            .map(|p| PathBuf::from(p.into_owned()))
            .unwrap_or(path);
        self.config_override = Some(expanded);
        self
    }

    /// Search this directory instead of the current working directory
    pub fn with_search_root(mut self, path: PathBuf) -> Self {
        self.search_root = Some(path);
        self
    }

    /// Search this directory instead of the user config directory
    pub fn with_config_home(mut self, path: PathBuf) -> Self {
        self.config_home = Some(path);
        self
    }

    /// Set base URL override
    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    /// Set router base path override
    pub fn with_app_base_override(mut self, app_base: String) -> Self {
        self.app_base_override = Some(app_base);
        self
    }

    /// Add a header override
    pub fn with_header_override(mut self, key: String, value: String) -> Self {
        self.header_overrides.insert(key, value);
        self
    }

    /// Set timeout override
    pub fn with_timeout_override(mut self, secs: u64) -> Self {
        self.timeout_override = Some(secs);
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<ResolvedApiConfig> {
        // Step 1: Find and load base configuration
        let mut config = if let Some(override_path) = &self.config_override {
            self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            self.search_and_load().await?
        };

        // Step 2: Apply flag overrides
        if let Some(base_url) = &self.base_url_override {
            config.base_url = Some(base_url.clone());
        }
        if let Some(app_base) = &self.app_base_override {
            config.app_base = Some(app_base.clone());
        }
        if let Some(timeout) = self.timeout_override {
            config.timeout_secs = Some(timeout);
        }
        config.headers.extend(self.header_overrides.clone());

        // Step 3: Resolve to final API config
        self.resolve_config(config)
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<RawConfig> {
        // 1. Current working directory
        if let Some(config) = self.try_load_cwd().await? {
            return Ok(config);
        }

        // 2. User config directory
        if let Some(config) = self.try_load_config_home().await? {
            return Ok(config);
        }

        // 3. Environment variables only
        self.load_env_only()
    }

    /// Try loading from the current working directory
    async fn try_load_cwd(&self) -> Result<Option<RawConfig>> {
        let cwd = match &self.search_root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };

        let candidates = [
            cwd.join("gradebook.json"),
            cwd.join(".gradebook").join("config.json"),
        ];
        for candidate in &candidates {
            if candidate.exists() {
                return Ok(Some(self.load_file(candidate).await?));
            }
        }

        Ok(None)
    }

    /// Try loading from the user config directory
    async fn try_load_config_home(&self) -> Result<Option<RawConfig>> {
        let Some(config_dir) = self.config_home.clone().or_else(dirs::config_dir) else {
            return Ok(None);
        };

        let config_path = config_dir.join("gradebook").join("config.json");
        if config_path.exists() {
            return Ok(Some(self.load_file(&config_path).await?));
        }
        Ok(None)
    }

    /// Build configuration from environment variables alone
    fn load_env_only(&self) -> Result<RawConfig> {
        let timeout_secs = match std::env::var("GRADEBOOK_TIMEOUT") {
            Ok(value) => Some(
                value
                    .parse()
                    .with_context(|| format!("GRADEBOOK_TIMEOUT is not a number: {}", value))?,
            ),
            Err(_) => None,
        };

        Ok(RawConfig {
            base_url: std::env::var("GRADEBOOK_BASE_URL").ok(),
            app_base: std::env::var("GRADEBOOK_APP_BASE").ok(),
            headers: HashMap::new(),
            timeout_secs,
        })
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        tracing::debug!("Loading config from {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolve raw config to ResolvedApiConfig
    fn resolve_config(&self, config: RawConfig) -> Result<ResolvedApiConfig> {
        let mut headers = HashMap::with_capacity(config.headers.len());
        for (key, value) in config.headers {
            let value = match value.strip_prefix("env:") {
                Some(var_name) => std::env::var(var_name).with_context(|| {
                    format!("Environment variable not found: {}", var_name)
                })?,
                None => value,
            };
            headers.insert(key, value);
        }

        let mut resolved =
            ResolvedApiConfig::new(config.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
                .with_app_base(
                    config
                        .app_base
                        .unwrap_or_else(|| DEFAULT_APP_BASE.to_string()),
                )
                .with_headers(headers);
        resolved.timeout_secs = config.timeout_secs;

        resolved
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok(resolved)
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
