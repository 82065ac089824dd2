mod auth;
mod decode;
mod dispatch;
mod register;
mod request;
mod response;
#[cfg(test)]
mod test_utils;
mod types;

pub use auth::{authenticate, authenticate_with_policy};
pub use decode::DecodePolicy;
pub use dispatch::{
    CredentialSubsystem, RawAssertion, RawCredential, RawRegistration, SubsystemError,
};
pub use register::{create_passkey, create_passkey_with_policy};
pub use request::{
    CredentialRequest, LargeBlobOperation, PlatformAssertionRequest, PlatformCredentialRef,
    PlatformRegistrationRequest, PlatformTier, RequestBundle, SecurityKeyAssertionRequest,
    SecurityKeyCredentialRef, SecurityKeyRegistrationRequest, SecurityKeyTransport,
    SelectionPolicy,
};
pub use response::{
    AssertionPayload, AssertionResult, AttestationPayload, CeremonyResult, RegistrationResult,
};
pub use types::{
    AttestationPreference, AuthenticationOptions, AuthenticatorAttachment, AuthenticatorSelection,
    AuthenticatorTransport, CredentialDescriptor, CredentialParameter, LargeBlobAssertionInputs,
    LargeBlobSupport, RegistrationOptions, RelyingPartyEntity, ResidentKeyRequirement, UserEntity,
    UserVerification,
};
