//! passkey-ceremony - Passkey ceremony translation library
//!
//! This crate translates between the platform-independent WebAuthn JSON
//! contract (`navigator.credentials`-shaped option documents) and whatever
//! credential subsystem the host platform exposes. It decodes untyped
//! ceremony options into a strict model, shapes platform-bound and
//! security-key request descriptors from it, dispatches them to an external
//! [`CredentialSubsystem`], and normalizes the raw outcome back into one
//! canonical JSON response shape.
//!
//! It does not verify signatures, store credentials, or judge attestation;
//! those belong to the relying party server and the platform respectively.

mod ceremony;
mod utils;

pub use ceremony::{
    AssertionPayload, AssertionResult, AttestationPayload, AttestationPreference,
    AuthenticationOptions, AuthenticatorAttachment, AuthenticatorSelection,
    AuthenticatorTransport, CeremonyError, CeremonyResult, CredentialDescriptor,
    CredentialParameter, CredentialRequest, CredentialSubsystem, DecodePolicy,
    LargeBlobAssertionInputs, LargeBlobOperation, LargeBlobSupport, PlatformAssertionRequest,
    PlatformCredentialRef, PlatformRegistrationRequest, PlatformTier, RawAssertion, RawCredential,
    RawRegistration, RegistrationOptions, RegistrationResult, RelyingPartyEntity, RequestBundle,
    ResidentKeyRequirement, SecurityKeyAssertionRequest, SecurityKeyCredentialRef,
    SecurityKeyRegistrationRequest, SecurityKeyTransport, SelectionPolicy, SubsystemError,
    UserEntity, UserVerification, authenticate, authenticate_with_policy, create_passkey,
    create_passkey_with_policy,
};

/// Eagerly resolves environment-backed configuration.
///
/// Invalid values never abort the process; they fall back to documented
/// defaults with a warning. Calling this at startup surfaces those warnings
/// before the first ceremony instead of in the middle of one.
pub fn init() {
    ceremony::init();
}
