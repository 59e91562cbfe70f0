//! Privacy module creators, qualifiers, and the creator registry.
//!
//! One creator exists per regulatory family and is registered at process
//! start; modules themselves are built per request from a
//! [`ModuleCreationContext`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::account::AccountPrivacyConfig;
use crate::activity::Activity;
use crate::gpp::GppContext;
use crate::metrics::Metrics;
use crate::module::PrivacyModule;
use crate::tcfeu::{JsonTcfSectionSource, TcfEuModuleCreator};
use crate::usnat::{JsonUsSectionSource, UsNatModuleCreator};

/// The regulatory family a creator/module belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyModuleQualifier {
    /// Shared US national/state model (GPP sections 7-12).
    UsNat,
    /// EU TCF consent model (GPP section 2).
    TcfEu,
}

impl PrivacyModuleQualifier {
    /// All qualifiers, in evaluation order.
    pub const ALL: [PrivacyModuleQualifier; 2] =
        [PrivacyModuleQualifier::UsNat, PrivacyModuleQualifier::TcfEu];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyModuleQualifier::UsNat => "us_nat",
            PrivacyModuleQualifier::TcfEu => "tcf_eu",
        }
    }
}

impl fmt::Display for PrivacyModuleQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a creator needs to build a module for one request: the target
/// activity, the account's privacy document, and the request's consent
/// context. Immutable; never mutated after construction.
#[derive(Debug, Clone, Copy)]
pub struct ModuleCreationContext<'a> {
    pub activity: Activity,
    pub account: &'a AccountPrivacyConfig,
    pub gpp: &'a GppContext,
}

/// Builds a [`PrivacyModule`] for one regulatory family.
///
/// `build` is infallible by contract: configuration-disabled and
/// nothing-applies cases yield a no-op module, and section decode failures
/// degrade to skipped sections inside the returned module.
pub trait PrivacyModuleCreator: Send + Sync {
    fn qualifier(&self) -> PrivacyModuleQualifier;

    fn build(&self, context: &ModuleCreationContext<'_>) -> Box<dyn PrivacyModule>;
}

struct CreatorRegistryInner {
    creators: BTreeMap<PrivacyModuleQualifier, Arc<dyn PrivacyModuleCreator>>,
}

/// Fixed mapping from qualifier to creator, populated at process start.
///
/// Cloning is cheap; the inner map is shared.
#[derive(Clone)]
pub struct CreatorRegistry {
    inner: Arc<CreatorRegistryInner>,
}

impl CreatorRegistry {
    /// Build a registry from an explicit creator list.
    ///
    /// A later creator for the same qualifier replaces the earlier one.
    #[must_use]
    pub fn new(creators: Vec<Arc<dyn PrivacyModuleCreator>>) -> Self {
        let creators = creators
            .into_iter()
            .map(|creator| (creator.qualifier(), creator))
            .collect();
        Self {
            inner: Arc::new(CreatorRegistryInner { creators }),
        }
    }

    /// Registry wiring the shipped creators over the JSON-backed section
    /// sources. Hosts with a binary GPP codec register their own sources via
    /// [`CreatorRegistry::new`].
    #[must_use]
    pub fn with_defaults(metrics: Arc<dyn Metrics>) -> Self {
        Self::new(vec![
            Arc::new(UsNatModuleCreator::new(
                Arc::new(JsonUsSectionSource),
                Arc::clone(&metrics),
            )),
            Arc::new(TcfEuModuleCreator::new(
                Arc::new(JsonTcfSectionSource),
                metrics,
            )),
        ])
    }

    #[must_use]
    pub fn get(&self, qualifier: PrivacyModuleQualifier) -> Option<&Arc<dyn PrivacyModuleCreator>> {
        self.inner.creators.get(&qualifier)
    }

    /// Registered qualifiers in evaluation order.
    pub fn qualifiers(&self) -> impl Iterator<Item = PrivacyModuleQualifier> + '_ {
        self.inner.creators.keys().copied()
    }
}
