use serde_json::{Value, json};
use thiserror::Error;

use crate::utils::UtilError;

/// Errors that can occur while translating or dispatching a passkey ceremony.
///
/// This is a closed taxonomy shared by the options decoder and the ceremony
/// dispatcher, so callers handle exactly one error contract regardless of
/// which stage failed. Each variant carries a stable machine-readable code
/// (see [`CeremonyError::code`]).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CeremonyError {
    /// A required field was absent from the inbound options document
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A field was present but was not valid base64url, decoded to empty
    /// bytes, or otherwise could not be interpreted
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// No host window/context exists to anchor the credential prompt
    #[error("No presentation context available for the credential prompt")]
    NoPresentationContext,

    /// The user dismissed the platform prompt
    #[error("Ceremony was cancelled by the user")]
    Cancelled,

    /// The system interrupted the ceremony (e.g. the app was backgrounded)
    #[error("Ceremony was interrupted: {0}")]
    Interrupted(String),

    /// The platform credential provider is misconfigured
    /// (e.g. missing entitlement or domain association)
    #[error("Provider configuration error: {0}")]
    ProviderConfiguration(String),

    /// The device or OS cannot perform this ceremony kind
    #[error("Ceremony not supported on this device or platform: {0}")]
    Unsupported(String),

    /// An assertion found no credential matching the request
    #[error("No matching credential found for the given request")]
    NoCredential,

    /// The subsystem returned a payload shape this layer does not recognize
    #[error("Unsupported credential type: {0}")]
    UnsupportedCredentialType(String),

    /// Catch-all for unmapped subsystem failures; preserves the original
    /// message for diagnostics
    #[error("{0}")]
    Unknown(String),
}

impl CeremonyError {
    /// Stable machine-readable code for the caller-facing error contract.
    pub fn code(&self) -> &'static str {
        match self {
            CeremonyError::MissingField(_) => "MISSING_FIELD",
            CeremonyError::InvalidEncoding(_) => "INVALID_ENCODING",
            CeremonyError::NoPresentationContext => "NO_PRESENTATION_CONTEXT",
            CeremonyError::Cancelled => "CANCELLED",
            CeremonyError::Interrupted(_) => "INTERRUPTED",
            CeremonyError::ProviderConfiguration(_) => "PROVIDER_CONFIG_ERROR",
            CeremonyError::Unsupported(_) => "UNSUPPORTED_ERROR",
            CeremonyError::NoCredential => "NO_CREDENTIAL",
            CeremonyError::UnsupportedCredentialType(_) => "UNSUPPORTED_CREDENTIAL_TYPE",
            CeremonyError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// Serializes the caller-facing failure shape `{ code, message }`.
    pub fn to_value(&self) -> Value {
        json!({
            "code": self.code(),
            "message": self.to_string(),
        })
    }
}

impl From<UtilError> for CeremonyError {
    fn from(err: UtilError) -> Self {
        CeremonyError::InvalidEncoding(err.to_string())
    }
}
