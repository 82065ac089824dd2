//! Mock credential subsystems and canned option documents shared by the
//! ceremony tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::dispatch::{
    CredentialSubsystem, RawAssertion, RawCredential, RawRegistration, SubsystemError,
};
use super::request::RequestBundle;

pub(crate) fn registration_request() -> Value {
    json!({
        "publicKey": {
            "challenge": "AAAA",
            "rp": {"name": "Example", "id": "example.com"},
            "user": {"id": "AQID", "name": "a", "displayName": "A"},
            "pubKeyCredParams": [],
            "timeout": 1000
        }
    })
}

pub(crate) fn authentication_request() -> Value {
    json!({
        "publicKey": {
            "challenge": "AAAA",
            "rpId": "example.com"
        }
    })
}

pub(crate) fn raw_registration(credential_id: Vec<u8>) -> RawRegistration {
    RawRegistration {
        credential_id,
        attestation_object: vec![0xa0],
        client_data_json: b"{\"type\":\"webauthn.create\"}".to_vec(),
    }
}

pub(crate) fn raw_assertion(credential_id: Vec<u8>, user_handle: Option<Vec<u8>>) -> RawAssertion {
    RawAssertion {
        credential_id,
        client_data_json: b"{\"type\":\"webauthn.get\"}".to_vec(),
        authenticator_data: vec![4, 5, 6],
        signature: vec![7, 8, 9],
        user_handle,
    }
}

/// Always completes with a canned registration payload.
pub(crate) struct RegistrationSubsystem {
    credential_id: Vec<u8>,
}

impl RegistrationSubsystem {
    pub(crate) fn new(credential_id: Vec<u8>) -> Self {
        Self { credential_id }
    }
}

#[async_trait]
impl CredentialSubsystem for RegistrationSubsystem {
    async fn perform(&self, _bundle: &RequestBundle) -> Result<RawCredential, SubsystemError> {
        Ok(RawCredential::Registration(raw_registration(
            self.credential_id.clone(),
        )))
    }
}

/// Always completes with a canned assertion payload.
pub(crate) struct AssertionSubsystem {
    credential_id: Vec<u8>,
    user_handle: Option<Vec<u8>>,
}

impl AssertionSubsystem {
    pub(crate) fn new(credential_id: Vec<u8>, user_handle: Option<Vec<u8>>) -> Self {
        Self {
            credential_id,
            user_handle,
        }
    }
}

#[async_trait]
impl CredentialSubsystem for AssertionSubsystem {
    async fn perform(&self, _bundle: &RequestBundle) -> Result<RawCredential, SubsystemError> {
        Ok(RawCredential::Assertion(raw_assertion(
            self.credential_id.clone(),
            self.user_handle.clone(),
        )))
    }
}

/// Always fails with the given typed error.
pub(crate) struct FailingSubsystem {
    error: SubsystemError,
}

impl FailingSubsystem {
    pub(crate) fn new(error: SubsystemError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl CredentialSubsystem for FailingSubsystem {
    async fn perform(&self, _bundle: &RequestBundle) -> Result<RawCredential, SubsystemError> {
        Err(self.error.clone())
    }
}

enum RecordingOutcome {
    Registration,
    Assertion,
}

/// Records the submitted bundle so tests can assert on what the selector
/// produced, then completes with a canned payload.
pub(crate) struct RecordingSubsystem {
    outcome: RecordingOutcome,
    credential_id: Vec<u8>,
    last_bundle: Mutex<Option<RequestBundle>>,
}

impl RecordingSubsystem {
    pub(crate) fn registration(credential_id: Vec<u8>) -> Self {
        Self {
            outcome: RecordingOutcome::Registration,
            credential_id,
            last_bundle: Mutex::new(None),
        }
    }

    pub(crate) fn assertion(credential_id: Vec<u8>) -> Self {
        Self {
            outcome: RecordingOutcome::Assertion,
            credential_id,
            last_bundle: Mutex::new(None),
        }
    }

    pub(crate) fn last_bundle(&self) -> Option<RequestBundle> {
        self.last_bundle.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialSubsystem for RecordingSubsystem {
    async fn perform(&self, bundle: &RequestBundle) -> Result<RawCredential, SubsystemError> {
        *self.last_bundle.lock().unwrap() = Some(bundle.clone());
        match self.outcome {
            RecordingOutcome::Registration => Ok(RawCredential::Registration(raw_registration(
                self.credential_id.clone(),
            ))),
            RecordingOutcome::Assertion => Ok(RawCredential::Assertion(raw_assertion(
                self.credential_id.clone(),
                None,
            ))),
        }
    }
}
