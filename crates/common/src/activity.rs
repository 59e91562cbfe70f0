//! Regulated data-processing activities and invocation payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PrivacyGateError;

/// A regulated data-processing operation subject to permission checks.
///
/// Closed set: new activities are added here, never invented by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Sync user cookies with a bidder.
    SyncUser,
    /// Call out to a bidder adapter at all.
    CallBidder,
    /// Transmit user first-party data.
    TransmitUfpd,
    /// Transmit extended user identifiers.
    TransmitEids,
    /// Transmit precise geolocation.
    TransmitGeo,
    /// Transmit the transaction id.
    TransmitTid,
    /// Report the request to analytics adapters.
    ReportAnalytics,
}

impl Activity {
    /// All activities, in declaration order.
    pub const ALL: [Activity; 7] = [
        Activity::SyncUser,
        Activity::CallBidder,
        Activity::TransmitUfpd,
        Activity::TransmitEids,
        Activity::TransmitGeo,
        Activity::TransmitTid,
        Activity::ReportAnalytics,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::SyncUser => "sync_user",
            Activity::CallBidder => "call_bidder",
            Activity::TransmitUfpd => "transmit_ufpd",
            Activity::TransmitEids => "transmit_eids",
            Activity::TransmitGeo => "transmit_geo",
            Activity::TransmitTid => "transmit_tid",
            Activity::ReportAnalytics => "report_analytics",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activity {
    type Err = PrivacyGateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Activity::ALL
            .into_iter()
            .find(|activity| activity.as_str() == s)
            .ok_or_else(|| PrivacyGateError::UnknownActivity {
                name: s.to_string(),
            })
    }
}

/// The component on whose behalf an activity is being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Bidder,
    Analytics,
    General,
}

/// Payload describing one concrete invocation of an activity.
///
/// Passed to every module's `proceed`; rules that gate on the consent signal
/// alone are free to ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityInvocation {
    pub component_type: ComponentType,
    pub component_name: Option<String>,
}

impl ActivityInvocation {
    /// Invocation on behalf of a named bidder.
    #[must_use]
    pub fn bidder(name: impl Into<String>) -> Self {
        Self {
            component_type: ComponentType::Bidder,
            component_name: Some(name.into()),
        }
    }

    /// Invocation with no specific component attached.
    #[must_use]
    pub fn general() -> Self {
        Self {
            component_type: ComponentType::General,
            component_name: None,
        }
    }
}
