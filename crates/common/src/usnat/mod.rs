//! US national/state privacy module family (GPP sections 7-12).
//!
//! Section 7 carries the national baseline; 8-12 carry the individual state
//! sections, normalized to the national field model by the section source.

mod fields;
mod rules;

pub use fields::{JsonUsSectionSource, UsPrivacyFields, UsSectionSource};
pub use rules::UsNatRule;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::creator::{ModuleCreationContext, PrivacyModuleCreator, PrivacyModuleQualifier};
use crate::gpp::UsJurisdiction;
use crate::metrics::{AlertCategory, Metrics};
use crate::module::{NoOpModule, PrivacyModule, RuleSetModule};
use crate::rule::Rule;

/// Builds one [`RuleSetModule`] per request for the US family.
///
/// Holds the process-wide section-source and metrics capabilities; the
/// per-request inputs arrive through the creation context.
pub struct UsNatModuleCreator {
    source: Arc<dyn UsSectionSource>,
    metrics: Arc<dyn Metrics>,
}

impl UsNatModuleCreator {
    #[must_use]
    pub fn new(source: Arc<dyn UsSectionSource>, metrics: Arc<dyn Metrics>) -> Self {
        Self { source, metrics }
    }
}

impl PrivacyModuleCreator for UsNatModuleCreator {
    fn qualifier(&self) -> PrivacyModuleQualifier {
        PrivacyModuleQualifier::UsNat
    }

    fn build(&self, context: &ModuleCreationContext<'_>) -> Box<dyn PrivacyModule> {
        let config = &context.account.us_nat;
        if !config.enabled {
            return Box::new(NoOpModule);
        }

        let skip: BTreeSet<u32> = config.skip_section_ids.iter().copied().collect();
        let candidates: Vec<(u32, UsJurisdiction)> = context
            .gpp
            .declared_section_ids()
            .filter_map(|id| UsJurisdiction::for_section(id).map(|jurisdiction| (id, jurisdiction)))
            .filter(|(id, _)| !skip.contains(id))
            .collect();
        if candidates.is_empty() {
            // Nothing applies: no source calls, no alerts.
            return Box::new(NoOpModule);
        }

        let mut rules: Vec<Box<dyn Rule>> = Vec::with_capacity(candidates.len());
        for (section_id, jurisdiction) in candidates {
            match self
                .source
                .read(section_id, context.gpp.raw_section(section_id))
            {
                Ok(section_fields) => {
                    log::debug!(
                        "built {} rule for section {} ({})",
                        self.qualifier(),
                        section_id,
                        jurisdiction.as_str()
                    );
                    rules.push(Box::new(UsNatRule::new(
                        context.activity,
                        section_fields,
                        config.honor_service_provider_mode,
                    )));
                }
                Err(report) => {
                    // One alert per malformed section; remaining ids still run.
                    log::warn!(
                        "skipping GPP section {} ({}): {:?}",
                        section_id,
                        jurisdiction.as_str(),
                        report
                    );
                    self.metrics.update_alerts_metrics(AlertCategory::General);
                }
            }
        }

        Box::new(RuleSetModule::new(rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{Activity, ActivityInvocation};
    use crate::creator::ModuleCreationContext;
    use crate::metrics::AtomicMetrics;
    use crate::rule::Decision;
    use crate::test_support::tests::{
        account_with_us_nat, gpp_with_sections, RecordingUsSource,
    };
    use std::collections::HashMap;
    use std::sync::Arc;

    fn creator(
        source: &Arc<RecordingUsSource>,
        metrics: &Arc<AtomicMetrics>,
    ) -> UsNatModuleCreator {
        UsNatModuleCreator::new(
            Arc::clone(source) as Arc<dyn UsSectionSource>,
            Arc::clone(metrics) as Arc<dyn Metrics>,
        )
    }

    #[test]
    fn qualifier_is_us_nat() {
        let source = Arc::new(RecordingUsSource::permissive());
        let metrics = Arc::new(AtomicMetrics::new());
        assert_eq!(
            creator(&source, &metrics).qualifier(),
            PrivacyModuleQualifier::UsNat
        );
    }

    #[test]
    fn disabled_config_builds_noop_without_source_calls() {
        let source = Arc::new(RecordingUsSource::permissive());
        let metrics = Arc::new(AtomicMetrics::new());
        let account = account_with_us_nat(false, &[]);
        let gpp = gpp_with_sections(&[7, 8]);
        let context = ModuleCreationContext {
            activity: Activity::TransmitUfpd,
            account: &account,
            gpp: &gpp,
        };

        let module = creator(&source, &metrics).build(&context);

        assert_eq!(
            module.proceed(&ActivityInvocation::general()),
            Decision::Abstain
        );
        assert!(source.calls().is_empty());
    }

    #[test]
    fn empty_declared_sections_build_noop_without_source_calls() {
        let source = Arc::new(RecordingUsSource::permissive());
        let metrics = Arc::new(AtomicMetrics::new());
        let account = account_with_us_nat(true, &[]);
        let gpp = gpp_with_sections(&[]);
        let context = ModuleCreationContext {
            activity: Activity::TransmitUfpd,
            account: &account,
            gpp: &gpp,
        };

        let module = creator(&source, &metrics).build(&context);

        assert_eq!(
            module.proceed(&ActivityInvocation::general()),
            Decision::Abstain
        );
        assert!(source.calls().is_empty());
        assert_eq!(metrics.alerts(AlertCategory::General), 0);
    }

    #[test]
    fn all_sections_skipped_builds_noop_without_source_calls() {
        let source = Arc::new(RecordingUsSource::permissive());
        let metrics = Arc::new(AtomicMetrics::new());
        let account = account_with_us_nat(true, &[7]);
        let gpp = gpp_with_sections(&[7]);
        let context = ModuleCreationContext {
            activity: Activity::TransmitUfpd,
            account: &account,
            gpp: &gpp,
        };

        creator(&source, &metrics).build(&context);

        assert!(source.calls().is_empty());
    }

    #[test]
    fn unsupported_section_ids_never_reach_the_source() {
        let source = Arc::new(RecordingUsSource::permissive());
        let metrics = Arc::new(AtomicMetrics::new());
        let account = account_with_us_nat(true, &[]);
        let gpp = gpp_with_sections(&[6, 7, 8, 9, 10, 11, 12, 13]);
        let context = ModuleCreationContext {
            activity: Activity::TransmitUfpd,
            account: &account,
            gpp: &gpp,
        };

        creator(&source, &metrics).build(&context);

        assert_eq!(source.calls(), vec![7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn configured_skip_list_is_honored() {
        let source = Arc::new(RecordingUsSource::permissive());
        let metrics = Arc::new(AtomicMetrics::new());
        let account = account_with_us_nat(true, &[8, 9]);
        let gpp = gpp_with_sections(&[7, 8, 9]);
        let context = ModuleCreationContext {
            activity: Activity::TransmitUfpd,
            account: &account,
            gpp: &gpp,
        };

        creator(&source, &metrics).build(&context);

        assert_eq!(source.calls(), vec![7]);
    }

    #[test]
    fn failing_section_alerts_once_and_remaining_sections_still_run() {
        let source = Arc::new(RecordingUsSource::failing_for(&[8]));
        let metrics = Arc::new(AtomicMetrics::new());
        let account = account_with_us_nat(true, &[]);
        let gpp = gpp_with_sections(&[7, 8, 9]);
        let context = ModuleCreationContext {
            activity: Activity::TransmitUfpd,
            account: &account,
            gpp: &gpp,
        };

        creator(&source, &metrics).build(&context);

        assert_eq!(source.calls(), vec![7, 8, 9]);
        assert_eq!(metrics.alerts(AlertCategory::General), 1);
    }

    #[test]
    fn single_failing_section_yields_abstaining_module_with_one_alert() {
        let source = Arc::new(RecordingUsSource::failing_for(&[7]));
        let metrics = Arc::new(AtomicMetrics::new());
        let account = account_with_us_nat(true, &[]);
        let gpp = gpp_with_sections(&[7]);
        let context = ModuleCreationContext {
            activity: Activity::TransmitUfpd,
            account: &account,
            gpp: &gpp,
        };

        let module = creator(&source, &metrics).build(&context);

        assert_eq!(
            module.proceed(&ActivityInvocation::general()),
            Decision::Abstain
        );
        assert_eq!(metrics.alerts(AlertCategory::General), 1);
    }

    #[test]
    fn json_payloads_drive_the_decision() {
        let metrics = Arc::new(AtomicMetrics::new());
        let creator = UsNatModuleCreator::new(
            Arc::new(JsonUsSectionSource),
            Arc::clone(&metrics) as Arc<dyn Metrics>,
        );
        let account = account_with_us_nat(true, &[]);
        let gpp = crate::gpp::GppContext::new(
            [7],
            HashMap::from([(7, r#"{"gpc": true}"#.to_string())]),
        );
        let context = ModuleCreationContext {
            activity: Activity::TransmitUfpd,
            account: &account,
            gpp: &gpp,
        };

        let module = creator.build(&context);

        assert_eq!(
            module.proceed(&ActivityInvocation::general()),
            Decision::Deny
        );
        assert_eq!(metrics.alerts(AlertCategory::General), 0);
    }

    #[test]
    fn malformed_json_payload_alerts_and_degrades() {
        let metrics = Arc::new(AtomicMetrics::new());
        let creator = UsNatModuleCreator::new(
            Arc::new(JsonUsSectionSource),
            Arc::clone(&metrics) as Arc<dyn Metrics>,
        );
        let account = account_with_us_nat(true, &[]);
        let gpp = crate::gpp::GppContext::new(
            [7],
            HashMap::from([(7, "####".to_string())]),
        );
        let context = ModuleCreationContext {
            activity: Activity::TransmitUfpd,
            account: &account,
            gpp: &gpp,
        };

        let module = creator.build(&context);

        assert_eq!(
            module.proceed(&ActivityInvocation::general()),
            Decision::Abstain
        );
        assert_eq!(metrics.alerts(AlertCategory::General), 1);
    }
}
