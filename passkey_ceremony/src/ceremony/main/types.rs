/// Credential type fixed by the WebAuthn contract; the only value this layer
/// produces or recognizes.
pub(crate) const PUBLIC_KEY_CREDENTIAL_TYPE: &str = "public-key";

/// COSE algorithm identifier for ES256, the default credential parameter.
pub(crate) const COSE_ALG_ES256: i32 = -7;

/// Relying party entity with its identifier already resolved: the decoder
/// fills `id` from the options document or from configuration, and fails if
/// neither provides one.
#[derive(Debug, Clone, PartialEq)]
pub struct RelyingPartyEntity {
    pub name: String,
    pub id: String,
}

/// User account entity. `id` is base64url text validated at decode time to
/// decode to non-empty bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct UserEntity {
    pub name: String,
    pub display_name: String,
    pub id: String,
}

/// One entry of `pubKeyCredParams`. The credential type is always
/// "public-key" after decoding, so only the algorithm survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialParameter {
    pub alg: i32,
}

/// Exclude/allow-list entry. `id` is validated base64url text; `transports`
/// is `None` when the caller did not constrain transports.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialDescriptor {
    pub id: String,
    pub transports: Option<Vec<AuthenticatorTransport>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticatorTransport {
    Ble,
    Hybrid,
    Nfc,
    Usb,
}

impl AuthenticatorTransport {
    pub(crate) fn from_label(label: &str) -> Option<Self> {
        match label {
            "ble" => Some(Self::Ble),
            "hybrid" => Some(Self::Hybrid),
            "nfc" => Some(Self::Nfc),
            "usb" => Some(Self::Usb),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticatorAttachment {
    Platform,
    CrossPlatform,
}

impl AuthenticatorAttachment {
    pub(crate) fn from_label(label: &str) -> Option<Self> {
        match label {
            "platform" => Some(Self::Platform),
            "cross-platform" => Some(Self::CrossPlatform),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidentKeyRequirement {
    Discouraged,
    Preferred,
    Required,
}

impl ResidentKeyRequirement {
    pub(crate) fn from_label(label: &str) -> Option<Self> {
        match label {
            "discouraged" => Some(Self::Discouraged),
            "preferred" => Some(Self::Preferred),
            "required" => Some(Self::Required),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserVerification {
    Discouraged,
    #[default]
    Preferred,
    Required,
}

impl UserVerification {
    pub(crate) fn from_label(label: &str) -> Option<Self> {
        match label {
            "discouraged" => Some(Self::Discouraged),
            "preferred" => Some(Self::Preferred),
            "required" => Some(Self::Required),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttestationPreference {
    None,
    Indirect,
    #[default]
    Direct,
    Enterprise,
}

impl AttestationPreference {
    pub(crate) fn from_label(label: &str) -> Option<Self> {
        match label {
            "none" => Some(Self::None),
            "indirect" => Some(Self::Indirect),
            "direct" => Some(Self::Direct),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LargeBlobSupport {
    Preferred,
    Required,
}

impl LargeBlobSupport {
    pub(crate) fn from_label(label: &str) -> Option<Self> {
        match label {
            "preferred" => Some(Self::Preferred),
            "required" => Some(Self::Required),
            _ => None,
        }
    }
}

/// Large-blob extension inputs for the assertion ceremony. `write` has
/// already been reassembled from the inbound byte-index map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LargeBlobAssertionInputs {
    pub read: bool,
    pub write: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatorSelection {
    pub authenticator_attachment: Option<AuthenticatorAttachment>,
    pub resident_key: Option<ResidentKeyRequirement>,
    pub require_resident_key: bool,
    pub user_verification: UserVerification,
}

/// Decoded options for a registration ceremony
/// (`navigator.credentials.create()` shape).
///
/// Immutable once produced by the decoder; the request shaper only borrows
/// it. Lives for the duration of one ceremony call.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationOptions {
    pub rp: RelyingPartyEntity,
    pub user: UserEntity,
    pub challenge: String,
    pub pub_key_cred_params: Vec<CredentialParameter>,
    pub timeout: u32,
    pub exclude_credentials: Option<Vec<CredentialDescriptor>>,
    pub authenticator_selection: Option<AuthenticatorSelection>,
    pub attestation: Option<AttestationPreference>,
    pub large_blob_support: Option<LargeBlobSupport>,
}

/// Decoded options for an authentication ceremony
/// (`navigator.credentials.get()` shape).
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticationOptions {
    pub challenge: String,
    pub rp_id: String,
    pub timeout: u32,
    pub allow_credentials: Option<Vec<CredentialDescriptor>>,
    pub user_verification: Option<UserVerification>,
    pub large_blob: Option<LargeBlobAssertionInputs>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_labels() {
        assert_eq!(
            AuthenticatorTransport::from_label("usb"),
            Some(AuthenticatorTransport::Usb)
        );
        assert_eq!(
            AuthenticatorTransport::from_label("hybrid"),
            Some(AuthenticatorTransport::Hybrid)
        );
        assert_eq!(AuthenticatorTransport::from_label("smoke-signal"), None);
    }

    #[test]
    fn test_user_verification_default_is_preferred() {
        assert_eq!(UserVerification::default(), UserVerification::Preferred);
    }

    #[test]
    fn test_attestation_default_is_direct() {
        assert_eq!(
            AttestationPreference::default(),
            AttestationPreference::Direct
        );
    }

    #[test]
    fn test_attachment_labels() {
        assert_eq!(
            AuthenticatorAttachment::from_label("cross-platform"),
            Some(AuthenticatorAttachment::CrossPlatform)
        );
        assert_eq!(AuthenticatorAttachment::from_label("CrossPlatform"), None);
    }
}
