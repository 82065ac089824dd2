use serde::Serialize;

use crate::ceremony::errors::CeremonyError;
use crate::utils::base64url_encode;

use super::dispatch::{RawAssertion, RawCredential, RawRegistration};
use super::types::PUBLIC_KEY_CREDENTIAL_TYPE;

/// Canonical registration response:
/// `{ id, rawId, type: "public-key", response: { attestationObject, clientDataJSON } }`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResult {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub response: AttestationPayload,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttestationPayload {
    pub attestation_object: String,
    // WebAuthn spells this key with JSON fully capitalized
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
}

/// Canonical assertion response:
/// `{ id, rawId, type: "public-key", response: { clientDataJSON, authenticatorData, signature, userHandle? } }`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResult {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub response: AssertionPayload,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssertionPayload {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    pub authenticator_data: String,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>,
}

/// Normalized outcome of one ceremony, discriminated explicitly rather than
/// by runtime inspection of the subsystem payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CeremonyResult {
    Registration(RegistrationResult),
    Assertion(AssertionResult),
}

impl CeremonyResult {
    /// Normalizes a raw subsystem payload into the canonical response shape.
    ///
    /// `id` and `rawId` are both derived from the credential identifier, so
    /// they are always equal. Only registration and assertion payloads are
    /// supported; anything else is a hard boundary error.
    pub(crate) fn from_raw(raw: RawCredential) -> Result<Self, CeremonyError> {
        match raw {
            RawCredential::Registration(registration) => {
                Ok(Self::Registration(normalize_registration(registration)))
            }
            RawCredential::Assertion(assertion) => {
                Ok(Self::Assertion(normalize_assertion(assertion)))
            }
            RawCredential::Unrecognized { type_name } => {
                tracing::error!("Subsystem returned unrecognized payload: {}", type_name);
                Err(CeremonyError::UnsupportedCredentialType(type_name))
            }
        }
    }
}

fn normalize_registration(registration: RawRegistration) -> RegistrationResult {
    let id = base64url_encode(registration.credential_id);
    RegistrationResult {
        raw_id: id.clone(),
        id,
        type_: PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
        response: AttestationPayload {
            attestation_object: base64url_encode(registration.attestation_object),
            client_data_json: base64url_encode(registration.client_data_json),
        },
    }
}

fn normalize_assertion(assertion: RawAssertion) -> AssertionResult {
    let id = base64url_encode(assertion.credential_id);
    AssertionResult {
        raw_id: id.clone(),
        id,
        type_: PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
        response: AssertionPayload {
            client_data_json: base64url_encode(assertion.client_data_json),
            authenticator_data: base64url_encode(assertion.authenticator_data),
            signature: base64url_encode(assertion.signature),
            user_handle: assertion.user_handle.map(base64url_encode),
        },
    }
}
