//! Decoded field set for the US national/state GPP sections.
//!
//! State sections (8-12) are normalized to the national field model by the
//! section source, mirroring how the wire-format readers adapt each state
//! layout; the rules in this family therefore evaluate one uniform shape.
//!
//! Field value conventions follow the GPP US-national encoding:
//! notices are 0 = N/A, 1 = provided, 2 = not provided; opt-outs are
//! 0 = N/A, 1 = opted out, 2 = did not opt out; sensitive-data and
//! known-child entries are 0 = N/A, 1 = no consent, 2 = consent.

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};

use crate::error::PrivacyGateError;

/// Notice explicitly not provided.
pub const NOTICE_NOT_PROVIDED: u8 = 2;
/// Opted out of the processing in question.
pub const OPTED_OUT: u8 = 1;
/// Explicitly did not opt out.
pub const NOT_OPTED_OUT: u8 = 2;
/// Consent explicitly not given.
pub const CONSENT_NO: u8 = 1;
/// Consent explicitly given.
pub const CONSENT_YES: u8 = 2;
/// MSPA yes value (covered transaction / service-provider mode).
pub const MSPA_YES: u8 = 1;

/// Index into `sensitive_data_processing` for precise geolocation
/// (item 8 of the national section, zero-based).
pub const PRECISE_GEO_INDEX: usize = 7;

/// Typed view of one decoded US section. Every field is optional: an absent
/// field means the section did not express it, which folds into "no opinion"
/// rather than a restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsPrivacyFields {
    pub mspa_covered_transaction: Option<u8>,
    pub mspa_opt_out_option_mode: Option<u8>,
    pub mspa_service_provider_mode: Option<u8>,
    pub gpc: Option<bool>,
    pub sale_opt_out: Option<u8>,
    pub sale_opt_out_notice: Option<u8>,
    pub sharing_notice: Option<u8>,
    pub sharing_opt_out: Option<u8>,
    pub sharing_opt_out_notice: Option<u8>,
    pub targeted_advertising_opt_out: Option<u8>,
    pub targeted_advertising_opt_out_notice: Option<u8>,
    pub sensitive_data_limit_use_notice: Option<u8>,
    pub sensitive_data_processing_opt_out_notice: Option<u8>,
    pub sensitive_data_processing: Vec<u8>,
    pub known_child_sensitive_data_consents: Vec<u8>,
    pub personal_data_consents: Option<u8>,
}

impl UsPrivacyFields {
    /// Sensitive-data entry for precise geolocation, if expressed.
    #[must_use]
    pub fn precise_geo_consent(&self) -> Option<u8> {
        self.sensitive_data_processing
            .get(PRECISE_GEO_INDEX)
            .copied()
            .filter(|value| *value != 0)
    }

    /// Whether any known-child entry carries a signal (1 or 2).
    ///
    /// Both values are restrictive for this engine: data of a known child is
    /// not processed for the regulated transmissions regardless of the
    /// recorded consent value.
    #[must_use]
    pub fn known_child_signal(&self) -> bool {
        self.known_child_sensitive_data_consents
            .iter()
            .any(|value| *value != 0)
    }
}

/// Section-reader capability for the US family.
///
/// `section_id` is one of the supported ids 7-12; `payload` is the raw
/// section string when the request carried one. Implementations decode into
/// the normalized national field model. Decode failure is an explicit error
/// value; the creator converts it to "section skipped + alert".
pub trait UsSectionSource: Send + Sync {
    fn read(
        &self,
        section_id: u32,
        payload: Option<&str>,
    ) -> Result<UsPrivacyFields, Report<PrivacyGateError>>;
}

/// Source decoding JSON payloads of already-decoded fields.
///
/// Used by tests and the offline CLI; production hosts plug a binary GPP
/// codec behind the same trait. A declared section with no payload reads as
/// an empty field set, not an error.
#[derive(Debug, Default)]
pub struct JsonUsSectionSource;

impl UsSectionSource for JsonUsSectionSource {
    fn read(
        &self,
        section_id: u32,
        payload: Option<&str>,
    ) -> Result<UsPrivacyFields, Report<PrivacyGateError>> {
        match payload {
            None => Ok(UsPrivacyFields::default()),
            Some(json) => serde_json::from_str(json)
                .change_context(PrivacyGateError::SectionDecode { section_id }),
        }
    }
}
