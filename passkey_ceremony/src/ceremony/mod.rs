mod config;
mod errors;
mod main;

pub use errors::CeremonyError;

pub use main::{
    AssertionPayload, AssertionResult, AttestationPayload, AttestationPreference,
    AuthenticationOptions, AuthenticatorAttachment, AuthenticatorSelection,
    AuthenticatorTransport, CeremonyResult, CredentialDescriptor, CredentialParameter,
    CredentialRequest, CredentialSubsystem, DecodePolicy, LargeBlobAssertionInputs,
    LargeBlobOperation, LargeBlobSupport, PlatformAssertionRequest, PlatformCredentialRef,
    PlatformRegistrationRequest, PlatformTier, RawAssertion, RawCredential, RawRegistration,
    RegistrationOptions, RegistrationResult, RelyingPartyEntity, RequestBundle,
    ResidentKeyRequirement, SecurityKeyAssertionRequest, SecurityKeyCredentialRef,
    SecurityKeyRegistrationRequest, SecurityKeyTransport, SelectionPolicy, SubsystemError,
    UserEntity, UserVerification, authenticate, authenticate_with_policy, create_passkey,
    create_passkey_with_policy,
};

/// Force evaluation of the environment-backed configuration so invalid
/// values are warned about at startup rather than mid-ceremony.
pub(crate) fn init() {
    let _ = *config::PASSKEY_RP_ID;
    let _ = *config::PASSKEY_SELECTION_POLICY;
    let _ = *config::PASSKEY_PLATFORM_TIER;
    let _ = *config::PASSKEY_STRICT_OPTION_VOCAB;
}
