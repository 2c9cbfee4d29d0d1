#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::{
    ApiSettings, BoxSettings, CacheSettings, CatalogSettings, CatalogSource, PackerConfig,
    StorageSettings,
};

#[cfg(feature = "cli")]
pub use cli::CliConfig;
