//! Cross-cutting error types for root-cause resolution.
//!
//! These errors describe malformed input data. The resolver never propagates
//! them to its caller: each one is folded into the non-fatal
//! [`ResolutionErrors`](crate::context::ResolutionErrors) of a resolution pass.

use thiserror::Error;

/// Errors raised while interpreting upstream values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A granularity token was not of the form `<count>_<UNIT>`.
    #[error("Malformed granularity token: '{0}'")]
    MalformedGranularity(String),

    /// A record is missing an attribute the resolver needs.
    #[error("Record {urn} is missing attribute '{attribute}'")]
    MissingAttribute { urn: String, attribute: String },

    /// A record attribute is present but cannot be interpreted.
    #[error("Record {urn} has invalid attribute '{attribute}': '{value}'")]
    InvalidAttribute {
        urn: String,
        attribute: String,
        value: String,
    },
}
