use crate::i18n::Locale;
use dashmap::DashMap;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_LOCALE_KEY: &str = "SURVEY_DEFAULT_LOCALE";
pub const BIND_ADDR_KEY: &str = "SURVEY_BIND_ADDR";
pub const MESSAGES_DIR_KEY: &str = "SURVEY_MESSAGES_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Seeded from the process environment.
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Parse `key` when present; blank values count as absent.
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(value) = self.get(key).filter(|v| !v.trim().is_empty()) else {
            return Ok(None);
        };

        value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })
    }
}

/// Typed settings for the translation stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorSettings {
    /// Used when a request carries no usable `Accept-Language`
    pub default_locale: Locale,
    pub bind_addr: SocketAddr,
    /// Directory holding `messages*.properties` bundles
    pub messages_dir: Option<PathBuf>,
}

impl TranslatorSettings {
    pub fn from_config(config: &ConfigService) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            default_locale: config
                .get_parsed(DEFAULT_LOCALE_KEY)?
                .unwrap_or(defaults.default_locale),
            bind_addr: config.get_parsed(BIND_ADDR_KEY)?.unwrap_or(defaults.bind_addr),
            messages_dir: config.get_parsed(MESSAGES_DIR_KEY)?,
        })
    }
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            default_locale: Locale::default(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            messages_dir: None,
        }
    }
}
