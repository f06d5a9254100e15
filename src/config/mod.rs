mod file_config;

pub use file_config::{CatalogConfig, FileConfig};

use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_AUTH_BASE_URL: &str = "https://api.everrest.educata.dev/auth";
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_SUPPORT_ID: &str = "admin";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub profile_db: Option<PathBuf>,
    pub auth_base_url: Option<String>,
    pub catalog_base_url: Option<String>,
    pub catalog_api_key: Option<String>,
    pub support_id: Option<String>,
    pub default_price: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite profile file; None means an in-memory profile.
    pub profile_db: Option<PathBuf>,
    pub auth_base_url: String,
    pub catalog_base_url: String,
    /// Poster back-fill is disabled without a key.
    pub catalog_api_key: Option<String>,
    pub support_id: String,
    pub default_price: f64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let catalog = file.catalog.unwrap_or_default();

        let profile_db = file
            .profile_db
            .map(PathBuf::from)
            .or_else(|| cli.profile_db.clone());
        if let Some(path) = &profile_db {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    bail!("Profile database directory does not exist: {:?}", parent);
                }
            }
        }

        let auth_base_url = file
            .auth_base_url
            .or_else(|| cli.auth_base_url.clone())
            .unwrap_or_else(|| DEFAULT_AUTH_BASE_URL.to_string());

        let catalog_base_url = catalog
            .base_url
            .or_else(|| cli.catalog_base_url.clone())
            .unwrap_or_else(|| DEFAULT_CATALOG_BASE_URL.to_string());
        let catalog_api_key = catalog.api_key.or_else(|| cli.catalog_api_key.clone());

        let support_id = file
            .support_id
            .or_else(|| cli.support_id.clone())
            .unwrap_or_else(|| DEFAULT_SUPPORT_ID.to_string());

        let default_price = file
            .default_price
            .or(cli.default_price)
            .unwrap_or(crate::collections::DEFAULT_PRICE);
        if default_price < 0.0 {
            bail!("default_price must be non-negative, got {}", default_price);
        }

        Ok(Self {
            profile_db,
            auth_base_url,
            catalog_base_url,
            catalog_api_key,
            support_id,
            default_price,
        })
    }
}
