use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::AnalysisConfig;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api_keys: Option<ApiKeysConfig>,
    pub analysis: Option<AnalysisSection>,
    pub store: Option<StoreSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeysConfig {
    pub cohere_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub min_quote_len: Option<usize>,
    pub window_size: Option<usize>,
    pub lookup_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: Option<String>,
}

impl ConfigFile {
    /// Resolve an [`AnalysisConfig`], filling unset fields from defaults.
    pub fn analysis_config(&self) -> AnalysisConfig {
        let defaults = AnalysisConfig::default();
        let section = self.analysis.clone().unwrap_or_default();
        AnalysisConfig {
            min_quote_len: section.min_quote_len.unwrap_or(defaults.min_quote_len),
            window_size: section.window_size.unwrap_or(defaults.window_size),
            max_sources_per_quote: defaults.max_sources_per_quote,
            lookup_timeout_secs: section
                .lookup_timeout_secs
                .unwrap_or(defaults.lookup_timeout_secs),
        }
    }
}

/// Platform config directory path: `<config_dir>/veracity/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("veracity").join("config.toml"))
}

/// Load config by cascading CWD `.veracity.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".veracity.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        api_keys: Some(ApiKeysConfig {
            cohere_key: overlay
                .api_keys
                .as_ref()
                .and_then(|a| a.cohere_key.clone())
                .or_else(|| base.api_keys.as_ref().and_then(|a| a.cohere_key.clone())),
        }),
        analysis: Some(AnalysisSection {
            min_quote_len: overlay
                .analysis
                .as_ref()
                .and_then(|a| a.min_quote_len)
                .or_else(|| base.analysis.as_ref().and_then(|a| a.min_quote_len)),
            window_size: overlay
                .analysis
                .as_ref()
                .and_then(|a| a.window_size)
                .or_else(|| base.analysis.as_ref().and_then(|a| a.window_size)),
            lookup_timeout_secs: overlay
                .analysis
                .as_ref()
                .and_then(|a| a.lookup_timeout_secs)
                .or_else(|| base.analysis.as_ref().and_then(|a| a.lookup_timeout_secs)),
        }),
        store: Some(StoreSection {
            path: overlay
                .store
                .as_ref()
                .and_then(|s| s.path.clone())
                .or_else(|| base.store.as_ref().and_then(|s| s.path.clone())),
        }),
    }
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;
    Ok(path)
}
