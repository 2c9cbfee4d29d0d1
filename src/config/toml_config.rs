use crate::domain::model::PackagingBox;
use crate::utils::error::{PackingError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_measure, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 86_400;
const MAX_CACHE_TTL_SECONDS: u64 = 86_400;
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerConfig {
    pub api: ApiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub username: String,
    pub api_key: String,
    /// No timeout is applied when absent.
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// Filesystem cache location; in-memory when absent.
    pub directory: Option<String>,
    /// Entry bound for the in-memory cache.
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            directory: None,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

fn default_ttl_seconds() -> u64 {
    DEFAULT_CACHE_TTL_SECONDS
}

fn default_max_entries() -> u64 {
    DEFAULT_CACHE_MAX_ENTRIES
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file; an in-memory database is used when absent.
    pub database_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    #[default]
    Static,
    Database,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub source: CatalogSource,
    pub boxes: Option<Vec<BoxSettings>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxSettings {
    pub id: u64,
    pub width: f64,
    pub height: f64,
    pub length: f64,
    pub max_weight: f64,
}

impl From<&BoxSettings> for PackagingBox {
    fn from(settings: &BoxSettings) -> Self {
        PackagingBox::new(
            settings.id,
            settings.width,
            settings.height,
            settings.length,
            settings.max_weight,
        )
    }
}

impl PackerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PackingError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let config: PackerConfig =
            toml::from_str(&processed_content).map_err(|e| PackingError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 替換環境變數 (例如 ${BIN_PACKING_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PackingError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_seconds)
    }

    /// Boxes listed under `[catalog]`, if any.
    pub fn static_boxes(&self) -> Option<Vec<PackagingBox>> {
        self.catalog
            .boxes
            .as_ref()
            .map(|boxes| boxes.iter().map(PackagingBox::from).collect())
    }
}

impl Validate for PackerConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_non_empty_string("api.username", &self.api.username)?;
        validate_non_empty_string("api.api_key", &self.api.api_key)?;
        if let Some(timeout) = self.api.timeout_seconds {
            validate_range("api.timeout_seconds", timeout, 1, 600)?;
        }

        validate_range(
            "cache.ttl_seconds",
            self.cache.ttl_seconds,
            1,
            MAX_CACHE_TTL_SECONDS,
        )?;
        validate_range("cache.max_entries", self.cache.max_entries, 1, 1_000_000)?;

        if let Some(boxes) = &self.catalog.boxes {
            if self.catalog.source == CatalogSource::Database {
                tracing::warn!("catalog.boxes is ignored when catalog.source = \"database\"");
            }
            for (index, b) in boxes.iter().enumerate() {
                let field = |name: &str| format!("catalog.boxes[{}].{}", index, name);
                validate_positive_measure(&field("width"), b.width)?;
                validate_positive_measure(&field("height"), b.height)?;
                validate_positive_measure(&field("length"), b.length)?;
                validate_positive_measure(&field("max_weight"), b.max_weight)?;
            }
        }

        Ok(())
    }
}
