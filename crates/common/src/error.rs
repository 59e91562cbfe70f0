use derive_more::{Display, Error};

/// Errors surfaced at the configuration and section-decoding seams.
///
/// The evaluation path itself never returns an error to callers: a decode
/// failure degrades to "section skipped + alert" during module construction.
#[derive(Debug, Display, Error)]
pub enum PrivacyGateError {
    /// Process or account configuration could not be loaded or validated.
    #[display("Configuration error: {message}")]
    Configuration { message: String },

    /// Account privacy document could not be parsed or validated.
    #[display("Account privacy config error: {message}")]
    AccountConfig { message: String },

    /// A GPP section payload could not be decoded into its field set.
    #[display("Failed to decode GPP section {section_id}")]
    SectionDecode { section_id: u32 },

    /// An activity name outside the closed activity set.
    #[display("Unknown activity: {name}")]
    UnknownActivity { name: String },
}
