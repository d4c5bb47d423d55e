//! Conversion service configuration from environment variables.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default lifetime of a cached ingredient mapping (one hour).
pub const DEFAULT_MAPPING_CACHE_TTL_SECS: u64 = 60 * 60;

/// Canonical mass unit the density bridge goes through.
pub const DEFAULT_MASS_ANCHOR: &str = "g";

/// Canonical volume unit the density bridge goes through.
pub const DEFAULT_VOLUME_ANCHOR: &str = "ml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value}")]
    InvalidEnvVar { name: String, value: String },
}

/// Conversion service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionConfig {
    /// How long a looked-up ingredient mapping is served from cache.
    pub mapping_cache_ttl: Duration,
    /// Symbol of the unit density is expressed per, on the mass side (g).
    pub mass_anchor: String,
    /// Symbol of the unit density is expressed per, on the volume side (ml).
    pub volume_anchor: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            mapping_cache_ttl: Duration::from_secs(DEFAULT_MAPPING_CACHE_TTL_SECS),
            mass_anchor: DEFAULT_MASS_ANCHOR.to_string(),
            volume_anchor: DEFAULT_VOLUME_ANCHOR.to_string(),
        }
    }
}

impl ConversionConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `THUCDON_MAPPING_CACHE_TTL_SECS`: mapping cache TTL (default: 3600)
    /// - `THUCDON_MASS_ANCHOR`: mass anchor symbol (default: "g")
    /// - `THUCDON_VOLUME_ANCHOR`: volume anchor symbol (default: "ml")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mapping_cache_ttl = match lookup("THUCDON_MAPPING_CACHE_TTL_SECS") {
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
                    name: "THUCDON_MAPPING_CACHE_TTL_SECS".to_string(),
                    value: value.clone(),
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.mapping_cache_ttl,
        };

        let mass_anchor = lookup("THUCDON_MASS_ANCHOR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.mass_anchor);

        let volume_anchor = lookup("THUCDON_VOLUME_ANCHOR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.volume_anchor);

        Ok(Self {
            mapping_cache_ttl,
            mass_anchor,
            volume_anchor,
        })
    }
}
