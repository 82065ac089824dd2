use async_trait::async_trait;
use serde_json::json;

use passkey_ceremony::{
    CredentialSubsystem, RawAssertion, RawCredential, RawRegistration, RequestBundle,
    SubsystemError, authenticate, create_passkey,
};

/// Stand-in for a platform credential manager: completes every registration
/// and assertion instantly with canned bytes instead of prompting the user.
struct CannedSubsystem;

#[async_trait]
impl CredentialSubsystem for CannedSubsystem {
    async fn perform(&self, bundle: &RequestBundle) -> Result<RawCredential, SubsystemError> {
        use passkey_ceremony::CredentialRequest;

        tracing::info!("Subsystem received {} alternative(s)", bundle.requests.len());
        match bundle.requests.first() {
            Some(CredentialRequest::PlatformRegistration(_))
            | Some(CredentialRequest::SecurityKeyRegistration(_)) => {
                Ok(RawCredential::Registration(RawRegistration {
                    credential_id: vec![1, 2, 3],
                    attestation_object: vec![0xa3, 0x63, 0x66, 0x6d, 0x74],
                    client_data_json: br#"{"type":"webauthn.create"}"#.to_vec(),
                }))
            }
            Some(CredentialRequest::PlatformAssertion(_))
            | Some(CredentialRequest::SecurityKeyAssertion(_)) => {
                Ok(RawCredential::Assertion(RawAssertion {
                    credential_id: vec![1, 2, 3],
                    client_data_json: br#"{"type":"webauthn.get"}"#.to_vec(),
                    authenticator_data: vec![4, 5, 6],
                    signature: vec![7, 8, 9],
                    user_handle: Some(vec![42]),
                }))
            }
            None => Err(SubsystemError::Other("empty request bundle".to_string())),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    passkey_ceremony::init();

    let subsystem = CannedSubsystem;

    let create_request = json!({
        "publicKey": {
            "challenge": "AAAA",
            "rp": {"name": "Example", "id": "example.com"},
            "user": {"id": "AQID", "name": "demo", "displayName": "Demo User"},
            "pubKeyCredParams": [{"alg": -7, "type": "public-key"}],
            "timeout": 60000,
            "attestation": "none"
        }
    });
    let created = create_passkey(&subsystem, &create_request).await?;
    println!(
        "create response:\n{}",
        serde_json::to_string_pretty(&created)?
    );

    let get_request = json!({
        "publicKey": {
            "challenge": "BBBB",
            "rpId": "example.com",
            "allowCredentials": [{"id": created["id"], "type": "public-key"}]
        }
    });
    let asserted = authenticate(&subsystem, &get_request).await?;
    println!(
        "authenticate response:\n{}",
        serde_json::to_string_pretty(&asserted)?
    );

    // A malformed request short-circuits before the subsystem is called
    let err = create_passkey(&subsystem, &json!({"publicKey": {}}))
        .await
        .unwrap_err();
    println!("failure response:\n{}", serde_json::to_string_pretty(&err.to_value())?);

    Ok(())
}
