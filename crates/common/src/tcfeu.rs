//! EU TCF privacy module family (GPP section 2).
//!
//! A deliberately narrow view of the TCF string: purpose consents and
//! special-feature opt-ins, enough to gate the regulated transmissions. The
//! full vendor/legitimate-interest machinery stays in the consent codec.

use std::sync::Arc;

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};

use crate::activity::{Activity, ActivityInvocation};
use crate::creator::{ModuleCreationContext, PrivacyModuleCreator, PrivacyModuleQualifier};
use crate::error::PrivacyGateError;
use crate::gpp::TCF_EU_SECTION_ID;
use crate::metrics::{AlertCategory, Metrics};
use crate::module::{NoOpModule, PrivacyModule, RuleSetModule};
use crate::rule::{Decision, Rule};

/// TCF purpose 1: storage and/or access of information on a device.
pub const PURPOSE_DEVICE_STORAGE: u32 = 1;

/// TCF special feature 1: use precise geolocation data.
pub const SPECIAL_FEATURE_PRECISE_GEO: u32 = 1;

/// Decoded view of one TCF EU section.
///
/// `None` means the section did not express the list at all; an explicit
/// list without a given id is an explicit refusal for that id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcfEuFields {
    pub purposes_consent: Option<Vec<u32>>,
    pub special_feature_opt_ins: Option<Vec<u32>>,
}

impl TcfEuFields {
    fn purpose_decision(&self, purpose: u32) -> Decision {
        match &self.purposes_consent {
            None => Decision::Abstain,
            Some(consented) if consented.contains(&purpose) => Decision::Allow,
            Some(_) => Decision::Deny,
        }
    }

    fn special_feature_decision(&self, feature: u32) -> Decision {
        match &self.special_feature_opt_ins {
            None => Decision::Abstain,
            Some(opted_in) if opted_in.contains(&feature) => Decision::Allow,
            Some(_) => Decision::Deny,
        }
    }
}

/// Section-reader capability for the TCF family.
pub trait TcfSectionSource: Send + Sync {
    fn read(&self, payload: Option<&str>) -> Result<TcfEuFields, Report<PrivacyGateError>>;
}

/// Source decoding JSON payloads of already-decoded TCF fields; tests and the
/// offline CLI use it, production hosts plug the binary codec in.
#[derive(Debug, Default)]
pub struct JsonTcfSectionSource;

impl TcfSectionSource for JsonTcfSectionSource {
    fn read(&self, payload: Option<&str>) -> Result<TcfEuFields, Report<PrivacyGateError>> {
        match payload {
            None => Ok(TcfEuFields::default()),
            Some(json) => serde_json::from_str(json).change_context(
                PrivacyGateError::SectionDecode {
                    section_id: TCF_EU_SECTION_ID,
                },
            ),
        }
    }
}

/// The TCF section's opinion on the activity the module was built for.
pub struct TcfEuRule {
    activity: Activity,
    fields: TcfEuFields,
}

impl TcfEuRule {
    #[must_use]
    pub fn new(activity: Activity, fields: TcfEuFields) -> Self {
        Self { activity, fields }
    }

    fn precise_geo_decision(&self) -> Decision {
        let purpose = self.fields.purpose_decision(PURPOSE_DEVICE_STORAGE);
        if purpose == Decision::Deny {
            return Decision::Deny;
        }
        let feature = self
            .fields
            .special_feature_decision(SPECIAL_FEATURE_PRECISE_GEO);
        if feature == Decision::Deny {
            return Decision::Deny;
        }
        if purpose == Decision::Allow && feature == Decision::Allow {
            Decision::Allow
        } else {
            Decision::Abstain
        }
    }
}

impl Rule for TcfEuRule {
    fn evaluate(&self, _invocation: &ActivityInvocation) -> Decision {
        match self.activity {
            Activity::SyncUser | Activity::TransmitUfpd | Activity::TransmitEids => {
                self.fields.purpose_decision(PURPOSE_DEVICE_STORAGE)
            }
            Activity::TransmitGeo => self.precise_geo_decision(),
            Activity::CallBidder | Activity::TransmitTid | Activity::ReportAnalytics => {
                Decision::Abstain
            }
        }
    }
}

/// Builds the TCF module: no-op unless the family is enabled and the request
/// declares section 2; a malformed section alerts once and degrades to no-op.
pub struct TcfEuModuleCreator {
    source: Arc<dyn TcfSectionSource>,
    metrics: Arc<dyn Metrics>,
}

impl TcfEuModuleCreator {
    #[must_use]
    pub fn new(source: Arc<dyn TcfSectionSource>, metrics: Arc<dyn Metrics>) -> Self {
        Self { source, metrics }
    }
}

impl PrivacyModuleCreator for TcfEuModuleCreator {
    fn qualifier(&self) -> PrivacyModuleQualifier {
        PrivacyModuleQualifier::TcfEu
    }

    fn build(&self, context: &ModuleCreationContext<'_>) -> Box<dyn PrivacyModule> {
        if !context.account.tcf_eu.enabled {
            return Box::new(NoOpModule);
        }
        if !context.gpp.declares_section(TCF_EU_SECTION_ID) {
            return Box::new(NoOpModule);
        }

        match self.source.read(context.gpp.raw_section(TCF_EU_SECTION_ID)) {
            Ok(fields) => Box::new(RuleSetModule::new(vec![Box::new(TcfEuRule::new(
                context.activity,
                fields,
            ))])),
            Err(report) => {
                log::warn!("skipping TCF EU section: {report:?}");
                self.metrics.update_alerts_metrics(AlertCategory::General);
                Box::new(NoOpModule)
            }
        }
    }
}
