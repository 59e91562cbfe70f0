//! Per-account privacy module configuration.
//!
//! Account documents are owned by external account storage and arrive as
//! JSON (request path) or TOML (operator tooling); this module only defines
//! their shape and validation. Absent blocks deserialize to the disabled
//! default, so a partial document never fails to load.

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::creator::PrivacyModuleQualifier;
use crate::error::PrivacyGateError;

/// Per-account configuration for the US national/state family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UsNatModuleConfig {
    /// Whether the family is enabled for this account at all.
    pub enabled: bool,
    /// Section ids to ignore even when the request declares them.
    #[validate(length(max = 16))]
    pub skip_section_ids: Vec<u32>,
    /// Treat MSPA service-provider mode as an authoritative restriction.
    pub honor_service_provider_mode: bool,
}

impl Default for UsNatModuleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            skip_section_ids: Vec::new(),
            honor_service_provider_mode: true,
        }
    }
}

/// Per-account configuration for the EU TCF family.
///
/// The family reads a single section (2), so there is no skip-list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TcfEuModuleConfig {
    pub enabled: bool,
}

/// The account's privacy module document, one block per qualifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AccountPrivacyConfig {
    #[validate(nested)]
    pub us_nat: UsNatModuleConfig,
    #[validate(nested)]
    pub tcf_eu: TcfEuModuleConfig,
}

impl AccountPrivacyConfig {
    /// Parse an account document from JSON, as supplied by account storage.
    pub fn from_json(json: &str) -> Result<Self, Report<PrivacyGateError>> {
        let config: Self =
            serde_json::from_str(json).change_context(PrivacyGateError::AccountConfig {
                message: "invalid account privacy JSON".to_string(),
            })?;
        config
            .validate()
            .change_context(PrivacyGateError::AccountConfig {
                message: "account privacy document failed validation".to_string(),
            })?;
        Ok(config)
    }

    #[must_use]
    pub fn is_enabled(&self, qualifier: PrivacyModuleQualifier) -> bool {
        match qualifier {
            PrivacyModuleQualifier::UsNat => self.us_nat.enabled,
            PrivacyModuleQualifier::TcfEu => self.tcf_eu.enabled,
        }
    }

    /// Qualifiers enabled for this account, in registry order.
    pub fn enabled_qualifiers(&self) -> impl Iterator<Item = PrivacyModuleQualifier> + '_ {
        PrivacyModuleQualifier::ALL
            .into_iter()
            .filter(|qualifier| self.is_enabled(*qualifier))
    }
}
