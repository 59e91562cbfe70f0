//! Request-scoped view of the GPP consent signal.
//!
//! A [`GppContext`] is built once per request from the section ids the request
//! declared present and the raw payload per section id. It is read-only for
//! the rest of the request lifecycle. The low-level binary codec that turns a
//! payload into typed fields is an external collaborator consumed through the
//! per-family section-source traits (see [`crate::usnat`] and
//! [`crate::tcfeu`]).

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;

/// GPP section id carrying the EU TCF v2 string.
pub const TCF_EU_SECTION_ID: u32 = 2;

/// GPP section id of the US national baseline section.
pub const US_NATIONAL_SECTION_ID: u32 = 7;

/// The US-state variant a supported GPP section id represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsJurisdiction {
    National,
    California,
    Virginia,
    Colorado,
    Utah,
    Connecticut,
}

impl UsJurisdiction {
    /// Map a GPP section id to its US jurisdiction.
    ///
    /// Ids outside the supported 7-12 range (6, 13, ...) return `None` and are
    /// silently skipped by the US creator, not treated as errors.
    #[must_use]
    pub fn for_section(section_id: u32) -> Option<Self> {
        US_SECTION_JURISDICTIONS.get(&section_id).copied()
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UsJurisdiction::National => "us_national",
            UsJurisdiction::California => "us_ca",
            UsJurisdiction::Virginia => "us_va",
            UsJurisdiction::Colorado => "us_co",
            UsJurisdiction::Utah => "us_ut",
            UsJurisdiction::Connecticut => "us_ct",
        }
    }
}

static US_SECTION_JURISDICTIONS: Lazy<HashMap<u32, UsJurisdiction>> = Lazy::new(|| {
    HashMap::from([
        (7, UsJurisdiction::National),
        (8, UsJurisdiction::California),
        (9, UsJurisdiction::Virginia),
        (10, UsJurisdiction::Colorado),
        (11, UsJurisdiction::Utah),
        (12, UsJurisdiction::Connecticut),
    ])
});

/// Immutable per-request view of the consent signal: which section ids the
/// request declared present, and the raw payload per section id.
///
/// A section id may be declared without a payload; family section sources
/// treat the missing payload as "nothing expressed" rather than an error.
#[derive(Debug, Clone, Default)]
pub struct GppContext {
    section_ids: BTreeSet<u32>,
    sections: HashMap<u32, String>,
}

impl GppContext {
    /// Build a context from declared section ids and raw payloads.
    ///
    /// An empty id list yields a context in which nothing applies; callers
    /// with no consent signal at all use [`GppContext::default`].
    #[must_use]
    pub fn new(section_ids: impl IntoIterator<Item = u32>, sections: HashMap<u32, String>) -> Self {
        Self {
            section_ids: section_ids.into_iter().collect(),
            sections,
        }
    }

    /// Declared section ids in ascending numeric order.
    pub fn declared_section_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.section_ids.iter().copied()
    }

    #[must_use]
    pub fn declares_section(&self, section_id: u32) -> bool {
        self.section_ids.contains(&section_id)
    }

    /// Raw payload for a section id, if the request carried one.
    #[must_use]
    pub fn raw_section(&self, section_id: u32) -> Option<&str> {
        self.sections.get(&section_id).map(String::as_str)
    }
}
