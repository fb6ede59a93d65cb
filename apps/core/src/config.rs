use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::search::RESULT_LIMIT;

const CONFIG_FILE_NAME: &str = "config.toml";
const USAGE_FILE_NAME: &str = "app-usage.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON5 config: {0}")]
    Json5(#[from] json5::Error),
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_results: u16,
    pub usage_path: PathBuf,
    pub log_dir: PathBuf,
    pub calculator_enabled: bool,
    pub web_search_enabled: bool,
    pub web_search_url: String,
    pub recent_apps: usize,
    pub debounce_ms: u64,
    pub application_dirs: Vec<PathBuf>,
    pub icon_dirs: Vec<PathBuf>,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let cache = stable_cache_dir();
        Self {
            max_results: 8,
            usage_path: cache.join(USAGE_FILE_NAME),
            log_dir: cache.join("logs"),
            calculator_enabled: true,
            web_search_enabled: true,
            web_search_url: "https://www.google.com/search?q={query}".to_string(),
            recent_apps: 3,
            debounce_ms: 0,
            application_dirs: Vec::new(),
            icon_dirs: Vec::new(),
            config_path: stable_config_dir().join(CONFIG_FILE_NAME),
        }
    }
}

pub fn stable_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("quicklaunch")
}

pub fn stable_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("quicklaunch")
}

/// Loads the config at `path` (or the default location). A missing file
/// yields defaults; `.json5` files are parsed as JSON5, anything else as TOML.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| stable_config_dir().join(CONFIG_FILE_NAME));

    let raw = match std::fs::read_to_string(&config_path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Config {
                config_path,
                ..Config::default()
            });
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: config_path,
                source,
            })
        }
    };

    let mut cfg = parse(&raw, &config_path)?;
    cfg.config_path = config_path;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn parse(raw: &str, path: &Path) -> Result<Config, ConfigError> {
    let is_json5 = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json5"));

    if is_json5 {
        Ok(json5::from_str(raw)?)
    } else {
        Ok(toml::from_str(raw)?)
    }
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg)?;
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let encoded = toml::to_string_pretty(cfg)?;
    std::fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Write {
        path: cfg.config_path.clone(),
        source,
    })
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.max_results == 0 || usize::from(cfg.max_results) > RESULT_LIMIT {
        return Err(ConfigError::Invalid(format!(
            "max_results must be between 1 and {RESULT_LIMIT}"
        )));
    }

    if cfg.usage_path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("usage_path is required".into()));
    }

    if cfg.recent_apps > 20 {
        return Err(ConfigError::Invalid(
            "recent_apps must be at most 20".into(),
        ));
    }

    if cfg.debounce_ms > 1_000 {
        return Err(ConfigError::Invalid(
            "debounce_ms must be at most 1000".into(),
        ));
    }

    if cfg.web_search_enabled && !cfg.web_search_url.contains("{query}") {
        return Err(ConfigError::Invalid(
            "web_search_url must contain a {query} placeholder".into(),
        ));
    }

    Ok(())
}
