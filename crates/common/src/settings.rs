//! Process configuration management and validation.
//!
//! Settings are loaded from the embedded `privacy-gate.toml` and merged with
//! environment variables prefixed with `PRIVACY_GATE__` (`__` separator), so
//! `PRIVACY_GATE__LOGGING__LEVEL=debug` overrides `logging.level`.

use std::str;

use config::{Config, ConfigError, Environment, File, FileFormat};
use error_stack::{Report, ResultExt};
use serde::Deserialize;
use validator::Validate;

use crate::account::AccountPrivacyConfig;
use crate::error::PrivacyGateError;

#[derive(Debug, Deserialize, Validate)]
pub struct Logging {
    #[validate(length(min = 1))]
    pub level: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub logging: Logging,
    /// Privacy document applied when account storage supplies none.
    #[validate(nested)]
    pub account_defaults: AccountPrivacyConfig,
}

impl Settings {
    /// Load the embedded default settings plus environment overrides.
    pub fn new() -> Result<Self, Report<PrivacyGateError>> {
        let toml_bytes = include_bytes!("../../../privacy-gate.toml");
        let toml_str = str::from_utf8(toml_bytes).change_context(
            PrivacyGateError::Configuration {
                message: "embedded settings are not valid UTF-8".to_string(),
            },
        )?;

        Self::from_toml(toml_str)
    }

    /// Parse settings from a TOML string, merge environment overrides, and
    /// validate the result.
    pub fn from_toml(toml_str: &str) -> Result<Self, Report<PrivacyGateError>> {
        let settings = Self::build_unvalidated(toml_str).change_context(
            PrivacyGateError::Configuration {
                message: "failed to load settings".to_string(),
            },
        )?;

        settings
            .validate()
            .change_context(PrivacyGateError::Configuration {
                message: "settings validation failed".to_string(),
            })?;

        Ok(settings)
    }

    fn build_unvalidated(toml_str: &str) -> Result<Self, ConfigError> {
        let environment = Environment::default().prefix("PRIVACY_GATE").separator("__");

        let toml = File::from_str(toml_str, FileFormat::Toml);
        let config = Config::builder()
            .add_source(toml)
            .add_source(environment)
            .build()?;

        config.try_deserialize()
    }

    /// Logging level filter, defaulting to `Info` on an unrecognised name.
    #[must_use]
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.logging.level.as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" => log::LevelFilter::Off,
            other => {
                log::warn!("unrecognised log level '{other}', falling back to info");
                log::LevelFilter::Info
            }
        }
    }
}
