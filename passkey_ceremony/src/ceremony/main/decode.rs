use serde_json::{Map, Value};

use crate::ceremony::config::{PASSKEY_RP_ID, PASSKEY_STRICT_OPTION_VOCAB};
use crate::ceremony::errors::CeremonyError;
use crate::utils::base64url_decode;

use super::types::{
    AttestationPreference, AuthenticationOptions, AuthenticatorSelection, AuthenticatorTransport,
    COSE_ALG_ES256, CredentialDescriptor, CredentialParameter, LargeBlobAssertionInputs,
    LargeBlobSupport, PUBLIC_KEY_CREDENTIAL_TYPE, RegistrationOptions, RelyingPartyEntity,
    ResidentKeyRequirement, UserEntity, UserVerification,
};

/// Knobs for how forgiving the options decoder is with inbound documents.
/// The default configuration is lenient: unrecognized enum text resolves to
/// documented defaults instead of failing.
#[derive(Debug, Clone)]
pub struct DecodePolicy {
    /// Fail decode on unrecognized enum text instead of falling back
    pub strict_vocab: bool,
    /// Relying-party id applied when the options document omits one
    pub fallback_rp_id: Option<String>,
}

impl DecodePolicy {
    pub(crate) fn from_config() -> Self {
        Self {
            strict_vocab: *PASSKEY_STRICT_OPTION_VOCAB,
            fallback_rp_id: PASSKEY_RP_ID.clone(),
        }
    }
}

impl RegistrationOptions {
    /// Decodes a `publicKey` registration options document, applying the
    /// configured decode policy.
    pub fn from_value(doc: &Value) -> Result<Self, CeremonyError> {
        Self::from_value_with_policy(doc, &DecodePolicy::from_config())
    }

    /// Decode either fully succeeds or fails with one [`CeremonyError`];
    /// no partial result is ever produced.
    pub fn from_value_with_policy(
        doc: &Value,
        policy: &DecodePolicy,
    ) -> Result<Self, CeremonyError> {
        let rp_value =
            field(doc, "rp").ok_or_else(|| CeremonyError::MissingField("rp".to_string()))?;
        let rp = RelyingPartyEntity {
            name: require_string(rp_value, "name", "rp.name")?,
            id: match optional_string(rp_value, "id", "rp.id")? {
                Some(id) => id,
                None => policy
                    .fallback_rp_id
                    .clone()
                    .ok_or_else(|| CeremonyError::MissingField("rp.id".to_string()))?,
            },
        };

        let user_value =
            field(doc, "user").ok_or_else(|| CeremonyError::MissingField("user".to_string()))?;
        let user = UserEntity {
            name: require_string(user_value, "name", "user.name")?,
            display_name: require_string(user_value, "displayName", "user.displayName")?,
            id: require_base64url(user_value, "id", "user.id")?,
        };

        let challenge = require_base64url(doc, "challenge", "challenge")?;

        let params_value = field(doc, "pubKeyCredParams")
            .ok_or_else(|| CeremonyError::MissingField("pubKeyCredParams".to_string()))?;
        let pub_key_cred_params = decode_credential_parameters(params_value, policy)?;

        let timeout = require_u32(doc, "timeout", "timeout")?;

        let exclude_credentials = match field(doc, "excludeCredentials") {
            Some(list) => Some(decode_descriptor_list(list, "excludeCredentials", policy)?),
            None => None,
        };

        let authenticator_selection = match field(doc, "authenticatorSelection") {
            Some(selection) => Some(decode_authenticator_selection(selection, policy)?),
            None => None,
        };

        let attestation = optional_enum(
            doc,
            "attestation",
            "attestation",
            AttestationPreference::from_label,
            Some(AttestationPreference::Direct),
            policy,
        )?;

        let large_blob_support = match field(doc, "extensions").and_then(|e| field(e, "largeBlob"))
        {
            Some(large_blob) => optional_enum(
                large_blob,
                "support",
                "extensions.largeBlob.support",
                LargeBlobSupport::from_label,
                None,
                policy,
            )?,
            None => None,
        };

        Ok(Self {
            rp,
            user,
            challenge,
            pub_key_cred_params,
            timeout,
            exclude_credentials,
            authenticator_selection,
            attestation,
            large_blob_support,
        })
    }
}

impl AuthenticationOptions {
    /// Decodes a `publicKey` authentication options document, applying the
    /// configured decode policy.
    pub fn from_value(doc: &Value) -> Result<Self, CeremonyError> {
        Self::from_value_with_policy(doc, &DecodePolicy::from_config())
    }

    pub fn from_value_with_policy(
        doc: &Value,
        policy: &DecodePolicy,
    ) -> Result<Self, CeremonyError> {
        let challenge = require_base64url(doc, "challenge", "challenge")?;

        let rp_id = match optional_string(doc, "rpId", "rpId")? {
            Some(id) => id,
            None => policy
                .fallback_rp_id
                .clone()
                .ok_or_else(|| CeremonyError::MissingField("rpId".to_string()))?,
        };

        let timeout = optional_u32(doc, "timeout", "timeout")?.unwrap_or(60_000);

        let allow_credentials = match field(doc, "allowCredentials") {
            Some(list) => Some(decode_descriptor_list(list, "allowCredentials", policy)?),
            None => None,
        };

        let user_verification = optional_enum(
            doc,
            "userVerification",
            "userVerification",
            UserVerification::from_label,
            Some(UserVerification::Preferred),
            policy,
        )?;

        let large_blob = match field(doc, "extensions").and_then(|e| field(e, "largeBlob")) {
            Some(large_blob) => Some(decode_large_blob_assertion(large_blob, policy)?),
            None => None,
        };

        Ok(Self {
            challenge,
            rp_id,
            timeout,
            allow_credentials,
            user_verification,
            large_blob,
        })
    }
}

/// Absent and JSON null are treated the same way throughout the decoder.
fn field<'a>(obj: &'a Value, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn require_string(obj: &Value, key: &str, path: &str) -> Result<String, CeremonyError> {
    match field(obj, key) {
        Some(value) => value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CeremonyError::InvalidEncoding(format!("{path} must be a string"))),
        None => Err(CeremonyError::MissingField(path.to_string())),
    }
}

fn optional_string(obj: &Value, key: &str, path: &str) -> Result<Option<String>, CeremonyError> {
    match field(obj, key) {
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| CeremonyError::InvalidEncoding(format!("{path} must be a string"))),
        None => Ok(None),
    }
}

/// Requires a base64url text field that decodes to non-empty bytes. Returns
/// the validated text, not the bytes; binary fields stay encoded inside the
/// options model.
fn require_base64url(obj: &Value, key: &str, path: &str) -> Result<String, CeremonyError> {
    let text = require_string(obj, key, path)?;
    let bytes = base64url_decode(&text)
        .map_err(|_| CeremonyError::InvalidEncoding(format!("{path} is not valid base64url")))?;
    if bytes.is_empty() {
        return Err(CeremonyError::InvalidEncoding(format!(
            "{path} decodes to empty bytes"
        )));
    }
    Ok(text)
}

fn require_u32(obj: &Value, key: &str, path: &str) -> Result<u32, CeremonyError> {
    optional_u32(obj, key, path)?.ok_or_else(|| CeremonyError::MissingField(path.to_string()))
}

fn optional_u32(obj: &Value, key: &str, path: &str) -> Result<Option<u32>, CeremonyError> {
    match field(obj, key) {
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| CeremonyError::InvalidEncoding(format!("{path} must be an integer"))),
        None => Ok(None),
    }
}

fn optional_bool(obj: &Value, key: &str, path: &str) -> Result<Option<bool>, CeremonyError> {
    match field(obj, key) {
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| CeremonyError::InvalidEncoding(format!("{path} must be a boolean"))),
        None => Ok(None),
    }
}

/// Decodes an optional enum-text field. Unrecognized text resolves to
/// `fallback` in lenient mode and fails decode in strict mode.
fn optional_enum<T: Copy + std::fmt::Debug>(
    obj: &Value,
    key: &str,
    path: &str,
    parse: fn(&str) -> Option<T>,
    fallback: Option<T>,
    policy: &DecodePolicy,
) -> Result<Option<T>, CeremonyError> {
    let Some(value) = field(obj, key) else {
        return Ok(None);
    };
    let text = value
        .as_str()
        .ok_or_else(|| CeremonyError::InvalidEncoding(format!("{path} must be a string")))?;
    match parse(text) {
        Some(parsed) => Ok(Some(parsed)),
        None if policy.strict_vocab => Err(CeremonyError::InvalidEncoding(format!(
            "{path} has unrecognized value '{text}'"
        ))),
        None => {
            tracing::warn!(
                "Unrecognized {} value '{}'. Falling back to {:?}",
                path,
                text,
                fallback
            );
            Ok(fallback)
        }
    }
}

fn decode_credential_parameters(
    list: &Value,
    policy: &DecodePolicy,
) -> Result<Vec<CredentialParameter>, CeremonyError> {
    let items = list.as_array().ok_or_else(|| {
        CeremonyError::InvalidEncoding("pubKeyCredParams must be an array".to_string())
    })?;

    let mut params = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let path = format!("pubKeyCredParams[{index}]");
        let alg = match field(item, "alg") {
            Some(value) => value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| {
                    CeremonyError::InvalidEncoding(format!("{path}.alg must be an integer"))
                })?,
            None => COSE_ALG_ES256,
        };
        // The type field only ever carries "public-key"; anything else is
        // forward-compat vocab and resolves to the default.
        validate_credential_type(item, &path, policy)?;
        params.push(CredentialParameter { alg });
    }
    Ok(params)
}

fn validate_credential_type(
    item: &Value,
    path: &str,
    policy: &DecodePolicy,
) -> Result<(), CeremonyError> {
    let Some(value) = field(item, "type") else {
        return Ok(());
    };
    let text = value
        .as_str()
        .ok_or_else(|| CeremonyError::InvalidEncoding(format!("{path}.type must be a string")))?;
    if text != PUBLIC_KEY_CREDENTIAL_TYPE {
        if policy.strict_vocab {
            return Err(CeremonyError::InvalidEncoding(format!(
                "{path}.type has unrecognized value '{text}'"
            )));
        }
        tracing::warn!(
            "Unrecognized {}.type value '{}'. Treating as '{}'",
            path,
            text,
            PUBLIC_KEY_CREDENTIAL_TYPE
        );
    }
    Ok(())
}

fn decode_descriptor_list(
    list: &Value,
    path: &str,
    policy: &DecodePolicy,
) -> Result<Vec<CredentialDescriptor>, CeremonyError> {
    let items = list
        .as_array()
        .ok_or_else(|| CeremonyError::InvalidEncoding(format!("{path} must be an array")))?;

    let mut descriptors = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item_path = format!("{path}[{index}]");
        let id = require_base64url(item, "id", &format!("{item_path}.id"))?;
        validate_credential_type(item, &item_path, policy)?;
        let transports = match field(item, "transports") {
            Some(value) => Some(decode_transports(value, &item_path, policy)?),
            None => None,
        };
        descriptors.push(CredentialDescriptor { id, transports });
    }
    Ok(descriptors)
}

fn decode_transports(
    list: &Value,
    item_path: &str,
    policy: &DecodePolicy,
) -> Result<Vec<AuthenticatorTransport>, CeremonyError> {
    let items = list.as_array().ok_or_else(|| {
        CeremonyError::InvalidEncoding(format!("{item_path}.transports must be an array"))
    })?;

    let mut transports = Vec::with_capacity(items.len());
    for entry in items {
        let text = entry.as_str().ok_or_else(|| {
            CeremonyError::InvalidEncoding(format!("{item_path}.transports must contain strings"))
        })?;
        match AuthenticatorTransport::from_label(text) {
            Some(transport) => transports.push(transport),
            None if policy.strict_vocab => {
                return Err(CeremonyError::InvalidEncoding(format!(
                    "{item_path}.transports has unrecognized value '{text}'"
                )));
            }
            None => {
                tracing::debug!("Skipping unrecognized transport '{}'", text);
            }
        }
    }
    Ok(transports)
}

fn decode_authenticator_selection(
    selection: &Value,
    policy: &DecodePolicy,
) -> Result<AuthenticatorSelection, CeremonyError> {
    Ok(AuthenticatorSelection {
        authenticator_attachment: optional_enum(
            selection,
            "authenticatorAttachment",
            "authenticatorSelection.authenticatorAttachment",
            super::types::AuthenticatorAttachment::from_label,
            None,
            policy,
        )?,
        resident_key: optional_enum(
            selection,
            "residentKey",
            "authenticatorSelection.residentKey",
            ResidentKeyRequirement::from_label,
            None,
            policy,
        )?,
        require_resident_key: optional_bool(
            selection,
            "requireResidentKey",
            "authenticatorSelection.requireResidentKey",
        )?
        .unwrap_or(false),
        user_verification: optional_enum(
            selection,
            "userVerification",
            "authenticatorSelection.userVerification",
            UserVerification::from_label,
            Some(UserVerification::Preferred),
            policy,
        )?
        .unwrap_or_default(),
    })
}

fn decode_large_blob_assertion(
    large_blob: &Value,
    _policy: &DecodePolicy,
) -> Result<LargeBlobAssertionInputs, CeremonyError> {
    let read = optional_bool(large_blob, "read", "extensions.largeBlob.read")?.unwrap_or(false);
    let write = match field(large_blob, "write") {
        Some(Value::Object(map)) => Some(decode_write_map(map, "extensions.largeBlob.write")?),
        Some(_) => {
            return Err(CeremonyError::InvalidEncoding(
                "extensions.largeBlob.write must be a byte-index map".to_string(),
            ));
        }
        None => None,
    };
    Ok(LargeBlobAssertionInputs { read, write })
}

/// Reassembles the inbound `{"0": b0, "1": b1, ...}` byte map into a
/// contiguous byte sequence in ascending numeric key order. Index gaps and
/// duplicates are not validated; the stable sort keeps duplicate-index bytes
/// in document order.
fn decode_write_map(map: &Map<String, Value>, path: &str) -> Result<Vec<u8>, CeremonyError> {
    let mut indexed: Vec<(u64, u8)> = Vec::with_capacity(map.len());
    for (key, value) in map {
        let index: u64 = key.parse().map_err(|_| {
            CeremonyError::InvalidEncoding(format!("{path} key '{key}' is not a decimal index"))
        })?;
        let byte = value
            .as_u64()
            .filter(|b| *b <= u8::MAX as u64)
            .ok_or_else(|| {
                CeremonyError::InvalidEncoding(format!("{path}[\"{key}\"] is not a byte value"))
            })? as u8;
        indexed.push((index, byte));
    }
    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, byte)| byte).collect())
}
