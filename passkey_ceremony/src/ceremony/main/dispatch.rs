use async_trait::async_trait;
use thiserror::Error;

use crate::ceremony::errors::CeremonyError;

use super::request::RequestBundle;

/// Raw registration payload as produced by the credential subsystem.
/// All fields are raw bytes; encoding happens in the response normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRegistration {
    pub credential_id: Vec<u8>,
    pub attestation_object: Vec<u8>,
    pub client_data_json: Vec<u8>,
}

/// Raw assertion payload as produced by the credential subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAssertion {
    pub credential_id: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub authenticator_data: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
}

/// Outcome of one ceremony as reported by the subsystem. `Unrecognized`
/// exists because platform credential APIs are polymorphic; a payload of any
/// other shape is a hard error in the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCredential {
    Registration(RawRegistration),
    Assertion(RawAssertion),
    Unrecognized { type_name: String },
}

/// Typed failures a credential subsystem can report. Mirrors the failure
/// vocabulary of platform credential managers; anything outside it travels
/// as `Other` and surfaces to callers as an unknown error with the original
/// message preserved.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubsystemError {
    #[error("{0}")]
    Cancelled(String),

    #[error("{0}")]
    Interrupted(String),

    #[error("{0}")]
    ProviderConfiguration(String),

    #[error("{0}")]
    Unsupported(String),

    #[error("{0}")]
    NoCredential(String),

    #[error("{0}")]
    NoPresentationContext(String),

    #[error("{0}")]
    Other(String),
}

impl From<SubsystemError> for CeremonyError {
    fn from(err: SubsystemError) -> Self {
        match err {
            SubsystemError::Cancelled(_) => CeremonyError::Cancelled,
            SubsystemError::Interrupted(message) => CeremonyError::Interrupted(message),
            SubsystemError::ProviderConfiguration(message) => {
                CeremonyError::ProviderConfiguration(message)
            }
            SubsystemError::Unsupported(message) => CeremonyError::Unsupported(message),
            SubsystemError::NoCredential(_) => CeremonyError::NoCredential,
            SubsystemError::NoPresentationContext(_) => CeremonyError::NoPresentationContext,
            SubsystemError::Other(message) => CeremonyError::Unknown(message),
        }
    }
}

/// The external credential subsystem that performs the actual
/// biometric/security-key ceremony.
///
/// Given one ceremony's request alternatives it must eventually yield
/// exactly one raw payload or one typed failure. The wait is user-paced
/// (biometric prompt, security-key tap); this layer imposes no timeout of
/// its own.
#[async_trait]
pub trait CredentialSubsystem: Send + Sync {
    async fn perform(&self, bundle: &RequestBundle) -> Result<RawCredential, SubsystemError>;
}

/// Submits exactly one ceremony and resolves to exactly one outcome.
///
/// This is the single suspension point of the translation layer. Every
/// subsystem failure is mapped into the closed error taxonomy; no retry is
/// performed here.
pub(crate) async fn dispatch<S>(
    subsystem: &S,
    bundle: &RequestBundle,
) -> Result<RawCredential, CeremonyError>
where
    S: CredentialSubsystem + ?Sized,
{
    tracing::debug!(
        "Dispatching ceremony with {} request alternative(s)",
        bundle.requests.len()
    );
    subsystem.perform(bundle).await.map_err(|err| {
        tracing::warn!("Credential subsystem reported failure: {}", err);
        CeremonyError::from(err)
    })
}
