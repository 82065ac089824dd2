use crate::ceremony::errors::CeremonyError;
use crate::utils::base64url_decode;

use super::types::{
    AttestationPreference, AuthenticationOptions, AuthenticatorTransport, CredentialDescriptor,
    CredentialParameter, LargeBlobSupport, RegistrationOptions, ResidentKeyRequirement,
    UserVerification,
};

/// Which request descriptor(s) to submit for a ceremony. This is an explicit
/// caller/configuration choice, never inferred from the options content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    PlatformOnly,
    SecurityKeyOnly,
    Both,
}

/// Capability tier of the platform credential API generation. Optional
/// descriptor fields introduced by a later generation are silently omitted
/// when shaping for an earlier tier, mirroring the OS-version gating of the
/// underlying platform calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlatformTier {
    Baseline,
    LargeBlob,
    Full,
}

impl PlatformTier {
    fn supports_large_blob(self) -> bool {
        self >= PlatformTier::LargeBlob
    }

    fn supports_exclude_list(self) -> bool {
        self >= PlatformTier::Full
    }
}

/// Transports a security-key descriptor can name. `hybrid` has no
/// security-key transport and is dropped during shaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityKeyTransport {
    Bluetooth,
    Nfc,
    Usb,
}

impl SecurityKeyTransport {
    fn all() -> Vec<Self> {
        vec![Self::Bluetooth, Self::Nfc, Self::Usb]
    }

    fn from_transport(transport: AuthenticatorTransport) -> Option<Self> {
        match transport {
            AuthenticatorTransport::Ble => Some(Self::Bluetooth),
            AuthenticatorTransport::Nfc => Some(Self::Nfc),
            AuthenticatorTransport::Usb => Some(Self::Usb),
            AuthenticatorTransport::Hybrid => None,
        }
    }
}

/// Credential reference shaped for the platform-bound path: the platform
/// authenticator needs only the raw credential id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformCredentialRef {
    pub id: Vec<u8>,
}

/// Credential reference shaped for the security-key path. An empty inbound
/// transport list means "all supported transports".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityKeyCredentialRef {
    pub id: Vec<u8>,
    pub transports: Vec<SecurityKeyTransport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformRegistrationRequest {
    pub rp_id: String,
    pub challenge: Vec<u8>,
    pub user_name: String,
    pub user_id: Vec<u8>,
    /// Advisory only; carried through to the subsystem, never enforced here
    pub timeout: u32,
    pub large_blob_support: Option<LargeBlobSupport>,
    pub user_verification: Option<UserVerification>,
    pub exclude_credentials: Option<Vec<PlatformCredentialRef>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecurityKeyRegistrationRequest {
    pub rp_id: String,
    pub challenge: Vec<u8>,
    pub user_name: String,
    pub user_display_name: String,
    pub user_id: Vec<u8>,
    pub timeout: u32,
    pub credential_parameters: Vec<CredentialParameter>,
    pub exclude_credentials: Option<Vec<SecurityKeyCredentialRef>>,
    pub resident_key: Option<ResidentKeyRequirement>,
    pub user_verification: Option<UserVerification>,
    pub attestation: Option<AttestationPreference>,
}

/// Large-blob instruction for a platform assertion. Only the platform-bound
/// path carries large-blob operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LargeBlobOperation {
    Read,
    Write(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformAssertionRequest {
    pub rp_id: String,
    pub challenge: Vec<u8>,
    pub timeout: u32,
    pub large_blob: Option<LargeBlobOperation>,
    pub allow_credentials: Option<Vec<PlatformCredentialRef>>,
    pub user_verification: Option<UserVerification>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecurityKeyAssertionRequest {
    pub rp_id: String,
    pub challenge: Vec<u8>,
    pub timeout: u32,
    pub allow_credentials: Option<Vec<SecurityKeyCredentialRef>>,
    pub user_verification: Option<UserVerification>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CredentialRequest {
    PlatformRegistration(PlatformRegistrationRequest),
    SecurityKeyRegistration(SecurityKeyRegistrationRequest),
    PlatformAssertion(PlatformAssertionRequest),
    SecurityKeyAssertion(SecurityKeyAssertionRequest),
}

/// One ceremony's worth of request alternatives. The subsystem serves
/// whichever alternative the user completes; exactly one outcome comes back.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBundle {
    pub requests: Vec<CredentialRequest>,
}

/// Builds the registration request bundle for the given selection policy.
pub(crate) fn shape_registration(
    options: &RegistrationOptions,
    policy: SelectionPolicy,
    tier: PlatformTier,
) -> Result<RequestBundle, CeremonyError> {
    let requests = match policy {
        SelectionPolicy::PlatformOnly => {
            vec![CredentialRequest::PlatformRegistration(
                platform_registration_request(options, tier)?,
            )]
        }
        SelectionPolicy::SecurityKeyOnly => {
            vec![CredentialRequest::SecurityKeyRegistration(
                security_key_registration_request(options, tier)?,
            )]
        }
        SelectionPolicy::Both => vec![
            CredentialRequest::PlatformRegistration(platform_registration_request(
                options, tier,
            )?),
            CredentialRequest::SecurityKeyRegistration(security_key_registration_request(
                options, tier,
            )?),
        ],
    };
    tracing::debug!(
        "Shaped {} registration request(s) under {:?}",
        requests.len(),
        policy
    );
    Ok(RequestBundle { requests })
}

/// Builds the assertion request bundle for the given selection policy.
pub(crate) fn shape_assertion(
    options: &AuthenticationOptions,
    policy: SelectionPolicy,
    tier: PlatformTier,
) -> Result<RequestBundle, CeremonyError> {
    let requests = match policy {
        SelectionPolicy::PlatformOnly => vec![CredentialRequest::PlatformAssertion(
            platform_assertion_request(options, tier)?,
        )],
        SelectionPolicy::SecurityKeyOnly => vec![CredentialRequest::SecurityKeyAssertion(
            security_key_assertion_request(options)?,
        )],
        SelectionPolicy::Both => vec![
            CredentialRequest::PlatformAssertion(platform_assertion_request(options, tier)?),
            CredentialRequest::SecurityKeyAssertion(security_key_assertion_request(options)?),
        ],
    };
    tracing::debug!(
        "Shaped {} assertion request(s) under {:?}",
        requests.len(),
        policy
    );
    Ok(RequestBundle { requests })
}

fn platform_registration_request(
    options: &RegistrationOptions,
    tier: PlatformTier,
) -> Result<PlatformRegistrationRequest, CeremonyError> {
    let exclude_credentials = if tier.supports_exclude_list() {
        options
            .exclude_credentials
            .as_ref()
            .map(|list| list.iter().map(platform_credential_ref).collect())
            .transpose()?
    } else {
        None
    };

    Ok(PlatformRegistrationRequest {
        rp_id: options.rp.id.clone(),
        challenge: base64url_decode(&options.challenge)?,
        user_name: options.user.name.clone(),
        user_id: base64url_decode(&options.user.id)?,
        timeout: options.timeout,
        large_blob_support: options
            .large_blob_support
            .filter(|_| tier.supports_large_blob()),
        user_verification: options
            .authenticator_selection
            .as_ref()
            .map(|selection| selection.user_verification),
        exclude_credentials,
    })
}

fn security_key_registration_request(
    options: &RegistrationOptions,
    tier: PlatformTier,
) -> Result<SecurityKeyRegistrationRequest, CeremonyError> {
    let exclude_credentials = if tier.supports_exclude_list() {
        options
            .exclude_credentials
            .as_ref()
            .map(|list| list.iter().map(security_key_credential_ref).collect())
            .transpose()?
    } else {
        None
    };

    Ok(SecurityKeyRegistrationRequest {
        rp_id: options.rp.id.clone(),
        challenge: base64url_decode(&options.challenge)?,
        user_name: options.user.name.clone(),
        user_display_name: options.user.display_name.clone(),
        user_id: base64url_decode(&options.user.id)?,
        timeout: options.timeout,
        credential_parameters: options.pub_key_cred_params.clone(),
        exclude_credentials,
        resident_key: options
            .authenticator_selection
            .as_ref()
            .and_then(|selection| selection.resident_key),
        user_verification: options
            .authenticator_selection
            .as_ref()
            .map(|selection| selection.user_verification),
        attestation: options.attestation,
    })
}

fn platform_assertion_request(
    options: &AuthenticationOptions,
    tier: PlatformTier,
) -> Result<PlatformAssertionRequest, CeremonyError> {
    let large_blob = if tier.supports_large_blob() {
        options.large_blob.as_ref().and_then(|inputs| {
            // A write instruction wins over a read flag when both are set
            match &inputs.write {
                Some(bytes) => Some(LargeBlobOperation::Write(bytes.clone())),
                None if inputs.read => Some(LargeBlobOperation::Read),
                None => None,
            }
        })
    } else {
        None
    };

    Ok(PlatformAssertionRequest {
        rp_id: options.rp_id.clone(),
        challenge: base64url_decode(&options.challenge)?,
        timeout: options.timeout,
        large_blob,
        allow_credentials: options
            .allow_credentials
            .as_ref()
            .map(|list| list.iter().map(platform_credential_ref).collect())
            .transpose()?,
        user_verification: options.user_verification,
    })
}

fn security_key_assertion_request(
    options: &AuthenticationOptions,
) -> Result<SecurityKeyAssertionRequest, CeremonyError> {
    Ok(SecurityKeyAssertionRequest {
        rp_id: options.rp_id.clone(),
        challenge: base64url_decode(&options.challenge)?,
        timeout: options.timeout,
        allow_credentials: options
            .allow_credentials
            .as_ref()
            .map(|list| list.iter().map(security_key_credential_ref).collect())
            .transpose()?,
        user_verification: options.user_verification,
    })
}

fn platform_credential_ref(
    descriptor: &CredentialDescriptor,
) -> Result<PlatformCredentialRef, CeremonyError> {
    Ok(PlatformCredentialRef {
        id: base64url_decode(&descriptor.id)?,
    })
}

fn security_key_credential_ref(
    descriptor: &CredentialDescriptor,
) -> Result<SecurityKeyCredentialRef, CeremonyError> {
    let transports = match &descriptor.transports {
        Some(list) if !list.is_empty() => list
            .iter()
            .filter_map(|t| SecurityKeyTransport::from_transport(*t))
            .collect(),
        _ => SecurityKeyTransport::all(),
    };
    Ok(SecurityKeyCredentialRef {
        id: base64url_decode(&descriptor.id)?,
        transports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ceremony::main::types::{
        AuthenticatorSelection, RelyingPartyEntity, UserEntity,
    };

    fn registration_options() -> RegistrationOptions {
        RegistrationOptions {
            rp: RelyingPartyEntity {
                name: "Example".to_string(),
                id: "example.com".to_string(),
            },
            user: UserEntity {
                name: "a".to_string(),
                display_name: "A".to_string(),
                id: "AQID".to_string(),
            },
            challenge: "AAAA".to_string(),
            pub_key_cred_params: vec![CredentialParameter { alg: -7 }],
            timeout: 1000,
            exclude_credentials: Some(vec![CredentialDescriptor {
                id: "AQID".to_string(),
                transports: Some(vec![
                    AuthenticatorTransport::Usb,
                    AuthenticatorTransport::Hybrid,
                ]),
            }]),
            authenticator_selection: Some(AuthenticatorSelection {
                authenticator_attachment: None,
                resident_key: Some(ResidentKeyRequirement::Preferred),
                require_resident_key: false,
                user_verification: UserVerification::Required,
            }),
            attestation: Some(AttestationPreference::Direct),
            large_blob_support: Some(LargeBlobSupport::Preferred),
        }
    }

    fn authentication_options() -> AuthenticationOptions {
        AuthenticationOptions {
            challenge: "AAAA".to_string(),
            rp_id: "example.com".to_string(),
            timeout: 60_000,
            allow_credentials: Some(vec![CredentialDescriptor {
                id: "AQID".to_string(),
                transports: None,
            }]),
            user_verification: Some(UserVerification::Preferred),
            large_blob: None,
        }
    }

    #[test]
    fn test_platform_only_produces_one_request() {
        let bundle = shape_registration(
            &registration_options(),
            SelectionPolicy::PlatformOnly,
            PlatformTier::Full,
        )
        .unwrap();
        assert_eq!(bundle.requests.len(), 1);
        assert!(matches!(
            bundle.requests[0],
            CredentialRequest::PlatformRegistration(_)
        ));
    }

    #[test]
    fn test_both_produces_platform_then_security_key() {
        let bundle = shape_registration(
            &registration_options(),
            SelectionPolicy::Both,
            PlatformTier::Full,
        )
        .unwrap();
        assert_eq!(bundle.requests.len(), 2);
        assert!(matches!(
            bundle.requests[0],
            CredentialRequest::PlatformRegistration(_)
        ));
        assert!(matches!(
            bundle.requests[1],
            CredentialRequest::SecurityKeyRegistration(_)
        ));
    }

    #[test]
    fn test_platform_registration_fields() {
        let options = registration_options();
        let request = platform_registration_request(&options, PlatformTier::Full).unwrap();
        assert_eq!(request.rp_id, "example.com");
        assert_eq!(request.user_id, vec![1, 2, 3]);
        assert_eq!(request.challenge, vec![0, 0, 0]);
        assert_eq!(request.large_blob_support, Some(LargeBlobSupport::Preferred));
        assert_eq!(request.user_verification, Some(UserVerification::Required));
        let excludes = request.exclude_credentials.unwrap();
        assert_eq!(excludes, vec![PlatformCredentialRef { id: vec![1, 2, 3] }]);
    }

    #[test]
    fn test_security_key_registration_fields() {
        let options = registration_options();
        let request = security_key_registration_request(&options, PlatformTier::Full).unwrap();
        assert_eq!(request.user_display_name, "A");
        assert_eq!(request.credential_parameters, vec![CredentialParameter {
            alg: -7
        }]);
        assert_eq!(request.resident_key, Some(ResidentKeyRequirement::Preferred));
        assert_eq!(request.attestation, Some(AttestationPreference::Direct));
        // hybrid has no security-key transport and is dropped
        let excludes = request.exclude_credentials.unwrap();
        assert_eq!(excludes[0].transports, vec![SecurityKeyTransport::Usb]);
    }

    #[test]
    fn test_absent_transports_mean_all_supported() {
        let descriptor = CredentialDescriptor {
            id: "AQID".to_string(),
            transports: None,
        };
        let shaped = security_key_credential_ref(&descriptor).unwrap();
        assert_eq!(shaped.transports, SecurityKeyTransport::all());

        let descriptor = CredentialDescriptor {
            id: "AQID".to_string(),
            transports: Some(vec![]),
        };
        let shaped = security_key_credential_ref(&descriptor).unwrap();
        assert_eq!(shaped.transports, SecurityKeyTransport::all());
    }

    #[test]
    fn test_baseline_tier_omits_newer_fields() {
        let options = registration_options();
        let request = platform_registration_request(&options, PlatformTier::Baseline).unwrap();
        assert!(request.large_blob_support.is_none());
        assert!(request.exclude_credentials.is_none());

        let request = platform_registration_request(&options, PlatformTier::LargeBlob).unwrap();
        assert_eq!(request.large_blob_support, Some(LargeBlobSupport::Preferred));
        assert!(request.exclude_credentials.is_none());
    }

    #[test]
    fn test_assertion_large_blob_write_wins_over_read() {
        let mut options = authentication_options();
        options.large_blob = Some(super::super::types::LargeBlobAssertionInputs {
            read: true,
            write: Some(vec![7, 8]),
        });
        let request = platform_assertion_request(&options, PlatformTier::Full).unwrap();
        assert_eq!(
            request.large_blob,
            Some(LargeBlobOperation::Write(vec![7, 8]))
        );

        options.large_blob = Some(super::super::types::LargeBlobAssertionInputs {
            read: true,
            write: None,
        });
        let request = platform_assertion_request(&options, PlatformTier::Full).unwrap();
        assert_eq!(request.large_blob, Some(LargeBlobOperation::Read));
    }

    #[test]
    fn test_security_key_assertion_has_no_large_blob() {
        let mut options = authentication_options();
        options.large_blob = Some(super::super::types::LargeBlobAssertionInputs {
            read: true,
            write: None,
        });
        let bundle =
            shape_assertion(&options, SelectionPolicy::SecurityKeyOnly, PlatformTier::Full)
                .unwrap();
        assert_eq!(bundle.requests.len(), 1);
        // The security-key request type simply carries no large-blob field;
        // assert the shape is the expected variant.
        assert!(matches!(
            bundle.requests[0],
            CredentialRequest::SecurityKeyAssertion(_)
        ));
    }

    #[test]
    fn test_shaper_does_not_mutate_options() {
        let options = registration_options();
        let before = options.clone();
        let _ = shape_registration(&options, SelectionPolicy::Both, PlatformTier::Full).unwrap();
        assert_eq!(options, before);
    }
}
