//! Top-level per-activity permission aggregation.

use crate::account::AccountPrivacyConfig;
use crate::activity::{Activity, ActivityInvocation};
use crate::creator::{CreatorRegistry, ModuleCreationContext, PrivacyModuleQualifier};
use crate::gpp::GppContext;
use crate::rule::Decision;

/// Per-request evaluation front door.
///
/// Owns the request's consent context and the account's privacy document;
/// holds a clone of the process-wide creator registry. All inputs are
/// immutable, so a single instance may serve concurrent activity checks.
pub struct ActivityInfrastructure {
    registry: CreatorRegistry,
    account: AccountPrivacyConfig,
    gpp: GppContext,
}

impl ActivityInfrastructure {
    #[must_use]
    pub fn new(registry: CreatorRegistry, account: AccountPrivacyConfig, gpp: GppContext) -> Self {
        Self {
            registry,
            account,
            gpp,
        }
    }

    /// Whether the activity is permitted for this invocation.
    ///
    /// Deny-dominant across qualifiers; if no enabled module expresses an
    /// opinion the default is permissive. Privacy modules are opt-in
    /// restrictions, never opt-in grants.
    #[must_use]
    pub fn is_allowed(&self, activity: Activity, invocation: &ActivityInvocation) -> bool {
        self.decide(activity, invocation) != Decision::Deny
    }

    /// The composed decision across every enabled qualifier.
    #[must_use]
    pub fn decide(&self, activity: Activity, invocation: &ActivityInvocation) -> Decision {
        let mut outcome = Decision::Abstain;
        for (qualifier, decision) in self.qualifier_decisions(activity, invocation) {
            match decision {
                Decision::Deny => {
                    log::debug!("{qualifier} denied {activity}");
                    return Decision::Deny;
                }
                Decision::Allow => outcome = Decision::Allow,
                Decision::Abstain => {}
            }
        }
        outcome
    }

    /// Per-qualifier decisions for the enabled modules, in evaluation order.
    ///
    /// Exposed for operator tooling; `decide` is the composing form.
    pub fn qualifier_decisions(
        &self,
        activity: Activity,
        invocation: &ActivityInvocation,
    ) -> impl Iterator<Item = (PrivacyModuleQualifier, Decision)> + '_ {
        let invocation = invocation.clone();
        self.account
            .enabled_qualifiers()
            .filter_map(move |qualifier| {
                let Some(creator) = self.registry.get(qualifier) else {
                    log::warn!("no creator registered for enabled qualifier {qualifier}");
                    return None;
                };
                let context = ModuleCreationContext {
                    activity,
                    account: &self.account,
                    gpp: &self.gpp,
                };
                let module = creator.build(&context);
                Some((qualifier, module.proceed(&invocation)))
            })
    }
}
