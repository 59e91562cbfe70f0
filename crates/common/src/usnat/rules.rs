//! Per-activity rule logic for the US national/state family.

use crate::activity::{Activity, ActivityInvocation};
use crate::rule::{Decision, Rule};

use super::fields::{
    UsPrivacyFields, CONSENT_NO, CONSENT_YES, MSPA_YES, NOTICE_NOT_PROVIDED, NOT_OPTED_OUT,
    OPTED_OUT,
};

/// One US section's opinion on the activity the module was built for.
///
/// Pure over the fields decoded at module-construction time; the invocation
/// payload is not consulted by this family.
pub struct UsNatRule {
    activity: Activity,
    fields: UsPrivacyFields,
    honor_service_provider_mode: bool,
}

impl UsNatRule {
    #[must_use]
    pub fn new(
        activity: Activity,
        fields: UsPrivacyFields,
        honor_service_provider_mode: bool,
    ) -> Self {
        Self {
            activity,
            fields,
            honor_service_provider_mode,
        }
    }

    fn service_provider_restricted(&self) -> bool {
        self.honor_service_provider_mode
            && self.fields.mspa_service_provider_mode == Some(MSPA_YES)
    }

    /// Sale/sharing/targeted-advertising logic shared by the identifier
    /// transmissions (sync user, UFPD, EIDs).
    fn personal_data_decision(&self) -> Decision {
        let fields = &self.fields;

        if self.service_provider_restricted() {
            return Decision::Deny;
        }
        if fields.gpc == Some(true) {
            return Decision::Deny;
        }
        if notice_withheld(fields.sale_opt_out_notice) || opted_out(fields.sale_opt_out) {
            return Decision::Deny;
        }
        if notice_withheld(fields.sharing_notice)
            || notice_withheld(fields.sharing_opt_out_notice)
            || opted_out(fields.sharing_opt_out)
        {
            return Decision::Deny;
        }
        if notice_withheld(fields.targeted_advertising_opt_out_notice)
            || opted_out(fields.targeted_advertising_opt_out)
        {
            return Decision::Deny;
        }
        if fields.known_child_signal() {
            return Decision::Deny;
        }
        if fields.personal_data_consents == Some(CONSENT_NO) {
            return Decision::Deny;
        }

        let affirmatively_allowed = fields.mspa_covered_transaction == Some(MSPA_YES)
            && fields.sale_opt_out == Some(NOT_OPTED_OUT)
            && fields.sharing_opt_out == Some(NOT_OPTED_OUT)
            && fields.targeted_advertising_opt_out == Some(NOT_OPTED_OUT);
        if affirmatively_allowed {
            Decision::Allow
        } else {
            Decision::Abstain
        }
    }

    fn precise_geo_decision(&self) -> Decision {
        let fields = &self.fields;

        if self.service_provider_restricted() {
            return Decision::Deny;
        }
        if notice_withheld(fields.sensitive_data_limit_use_notice)
            || notice_withheld(fields.sensitive_data_processing_opt_out_notice)
        {
            return Decision::Deny;
        }
        if fields.known_child_signal() {
            return Decision::Deny;
        }
        match fields.precise_geo_consent() {
            Some(CONSENT_NO) => Decision::Deny,
            Some(CONSENT_YES) => Decision::Allow,
            _ => Decision::Abstain,
        }
    }

    fn transaction_id_decision(&self) -> Decision {
        if self.service_provider_restricted() {
            Decision::Deny
        } else {
            Decision::Abstain
        }
    }
}

impl Rule for UsNatRule {
    fn evaluate(&self, _invocation: &ActivityInvocation) -> Decision {
        match self.activity {
            Activity::SyncUser | Activity::TransmitUfpd | Activity::TransmitEids => {
                self.personal_data_decision()
            }
            Activity::TransmitGeo => self.precise_geo_decision(),
            Activity::TransmitTid => self.transaction_id_decision(),
            // The US family expresses no opinion on these.
            Activity::CallBidder | Activity::ReportAnalytics => Decision::Abstain,
        }
    }
}

fn notice_withheld(value: Option<u8>) -> bool {
    value == Some(NOTICE_NOT_PROVIDED)
}

fn opted_out(value: Option<u8>) -> bool {
    value == Some(OPTED_OUT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usnat::fields::PRECISE_GEO_INDEX;

    fn evaluate(activity: Activity, fields: UsPrivacyFields) -> Decision {
        UsNatRule::new(activity, fields, true).evaluate(&ActivityInvocation::general())
    }

    #[test]
    fn empty_section_expresses_no_opinion() {
        for activity in Activity::ALL {
            assert_eq!(
                evaluate(activity, UsPrivacyFields::default()),
                Decision::Abstain,
                "{activity}"
            );
        }
    }

    #[test]
    fn service_provider_mode_denies_regulated_transmissions() {
        let fields = UsPrivacyFields {
            mspa_service_provider_mode: Some(MSPA_YES),
            ..Default::default()
        };
        for activity in [
            Activity::SyncUser,
            Activity::TransmitUfpd,
            Activity::TransmitEids,
            Activity::TransmitGeo,
            Activity::TransmitTid,
        ] {
            assert_eq!(evaluate(activity, fields.clone()), Decision::Deny, "{activity}");
        }
    }

    #[test]
    fn service_provider_mode_can_be_ignored_by_config() {
        let fields = UsPrivacyFields {
            mspa_service_provider_mode: Some(MSPA_YES),
            ..Default::default()
        };
        let rule = UsNatRule::new(Activity::TransmitUfpd, fields, false);
        assert_eq!(
            rule.evaluate(&ActivityInvocation::general()),
            Decision::Abstain
        );
    }

    #[test]
    fn gpc_denies_identifier_transmissions() {
        let fields = UsPrivacyFields {
            gpc: Some(true),
            ..Default::default()
        };
        assert_eq!(evaluate(Activity::TransmitUfpd, fields.clone()), Decision::Deny);
        assert_eq!(evaluate(Activity::SyncUser, fields), Decision::Deny);
    }

    #[test]
    fn sale_opt_out_denies() {
        let fields = UsPrivacyFields {
            sale_opt_out: Some(OPTED_OUT),
            ..Default::default()
        };
        assert_eq!(evaluate(Activity::TransmitUfpd, fields), Decision::Deny);
    }

    #[test]
    fn withheld_sale_notice_denies() {
        let fields = UsPrivacyFields {
            sale_opt_out_notice: Some(NOTICE_NOT_PROVIDED),
            ..Default::default()
        };
        assert_eq!(evaluate(Activity::SyncUser, fields), Decision::Deny);
    }

    #[test]
    fn covered_transaction_without_opt_outs_allows() {
        let fields = UsPrivacyFields {
            mspa_covered_transaction: Some(MSPA_YES),
            sale_opt_out: Some(NOT_OPTED_OUT),
            sharing_opt_out: Some(NOT_OPTED_OUT),
            targeted_advertising_opt_out: Some(NOT_OPTED_OUT),
            ..Default::default()
        };
        assert_eq!(evaluate(Activity::TransmitUfpd, fields), Decision::Allow);
    }

    #[test]
    fn partial_opt_out_fields_abstain() {
        let fields = UsPrivacyFields {
            mspa_covered_transaction: Some(MSPA_YES),
            sale_opt_out: Some(NOT_OPTED_OUT),
            ..Default::default()
        };
        assert_eq!(evaluate(Activity::TransmitUfpd, fields), Decision::Abstain);
    }

    #[test]
    fn known_child_denies_identifiers_and_geo() {
        let fields = UsPrivacyFields {
            known_child_sensitive_data_consents: vec![CONSENT_NO, 0],
            ..Default::default()
        };
        assert_eq!(evaluate(Activity::TransmitEids, fields.clone()), Decision::Deny);
        assert_eq!(evaluate(Activity::TransmitGeo, fields), Decision::Deny);
    }

    #[test]
    fn precise_geo_follows_sensitive_entry() {
        let mut no_consent = vec![0u8; PRECISE_GEO_INDEX + 1];
        no_consent[PRECISE_GEO_INDEX] = CONSENT_NO;
        let fields = UsPrivacyFields {
            sensitive_data_processing: no_consent,
            ..Default::default()
        };
        assert_eq!(evaluate(Activity::TransmitGeo, fields), Decision::Deny);

        let mut consent = vec![0u8; PRECISE_GEO_INDEX + 1];
        consent[PRECISE_GEO_INDEX] = CONSENT_YES;
        let fields = UsPrivacyFields {
            sensitive_data_processing: consent,
            ..Default::default()
        };
        assert_eq!(evaluate(Activity::TransmitGeo, fields), Decision::Allow);
    }

    #[test]
    fn withheld_sensitive_notice_denies_geo() {
        let fields = UsPrivacyFields {
            sensitive_data_limit_use_notice: Some(NOTICE_NOT_PROVIDED),
            ..Default::default()
        };
        assert_eq!(evaluate(Activity::TransmitGeo, fields), Decision::Deny);
    }

    #[test]
    fn family_abstains_on_uncovered_activities() {
        let fields = UsPrivacyFields {
            gpc: Some(true),
            sale_opt_out: Some(OPTED_OUT),
            ..Default::default()
        };
        assert_eq!(evaluate(Activity::CallBidder, fields.clone()), Decision::Abstain);
        assert_eq!(evaluate(Activity::ReportAnalytics, fields), Decision::Abstain);
    }
}
