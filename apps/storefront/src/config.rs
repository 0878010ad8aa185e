//! Storefront configuration module.
//!
//! Configuration is loaded from environment variables (after an optional
//! `.env` file) with fallback to defaults. Components receive the parts
//! they need at construction.

use std::env;
use std::path::PathBuf;

use storefront_core::catalog::PageDefaults;
use storefront_core::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use storefront_db::DbConfig;

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Port the public URL defaults to
    pub port: u16,

    /// Base URL used in catalog navigation links
    pub public_url: String,

    /// Page size when `limit` is absent or invalid
    pub default_page_size: u32,

    /// Requested page sizes above this are clamped
    pub max_page_size: u32,
}

/// Settings the catalog service is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    /// List endpoint that prev/next links point at
    pub link_base: String,

    pub page_defaults: PageDefaults,
}

impl StorefrontConfig {
    /// Load configuration from `.env` and environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or("PORT", lookup("PORT"), 8080)?;

        let config = StorefrontConfig {
            database_path: lookup("STOREFRONT_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./storefront.db")),

            port,

            public_url: lookup("STOREFRONT_PUBLIC_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://localhost:{port}")),

            default_page_size: parse_or(
                "STOREFRONT_DEFAULT_PAGE_SIZE",
                lookup("STOREFRONT_DEFAULT_PAGE_SIZE"),
                DEFAULT_PAGE_SIZE,
            )?,

            max_page_size: parse_or(
                "STOREFRONT_MAX_PAGE_SIZE",
                lookup("STOREFRONT_MAX_PAGE_SIZE"),
                MAX_PAGE_SIZE,
            )?,
        };

        if config.public_url.is_empty() {
            return Err(ConfigError::InvalidValue("STOREFRONT_PUBLIC_URL".to_string()));
        }

        if config.default_page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "STOREFRONT_DEFAULT_PAGE_SIZE".to_string(),
            ));
        }

        if config.max_page_size == 0 {
            return Err(ConfigError::InvalidValue("STOREFRONT_MAX_PAGE_SIZE".to_string()));
        }

        if config.default_page_size > config.max_page_size {
            return Err(ConfigError::Inconsistent(format!(
                "STOREFRONT_DEFAULT_PAGE_SIZE ({}) exceeds STOREFRONT_MAX_PAGE_SIZE ({})",
                config.default_page_size, config.max_page_size
            )));
        }

        Ok(config)
    }

    /// Database settings for this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
    }

    /// Catalog settings for this configuration.
    pub fn catalog_settings(&self) -> CatalogSettings {
        CatalogSettings {
            link_base: format!("{}/api/products", self.public_url),
            page_defaults: PageDefaults {
                page_size: self.default_page_size,
                max_page_size: self.max_page_size,
            },
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Inconsistent configuration: {0}")]
    Inconsistent(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.database_path, PathBuf::from("./storefront.db"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.public_url, "http://localhost:8080");
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 100);

        let settings = config.catalog_settings();
        assert_eq!(settings.link_base, "http://localhost:8080/api/products");
        assert_eq!(settings.page_defaults, PageDefaults::default());
    }

    #[test]
    fn test_public_url_follows_port_unless_set() {
        let config = load(&[("PORT", "3000")]).unwrap();
        assert_eq!(config.public_url, "http://localhost:3000");

        let config = load(&[("PORT", "3000"), ("STOREFRONT_PUBLIC_URL", "https://shop.example/")]).unwrap();
        assert_eq!(config.catalog_settings().link_base, "https://shop.example/api/products");
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidValue("PORT".to_string()))
        );
        assert_eq!(
            load(&[("STOREFRONT_MAX_PAGE_SIZE", "0")]),
            Err(ConfigError::InvalidValue("STOREFRONT_MAX_PAGE_SIZE".to_string()))
        );
        assert!(matches!(
            load(&[("STOREFRONT_DEFAULT_PAGE_SIZE", "50"), ("STOREFRONT_MAX_PAGE_SIZE", "20")]),
            Err(ConfigError::Inconsistent(_))
        ));
    }
}
