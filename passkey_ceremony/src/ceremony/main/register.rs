use serde_json::Value;

use crate::ceremony::config::{PASSKEY_PLATFORM_TIER, PASSKEY_SELECTION_POLICY};
use crate::ceremony::errors::CeremonyError;

use super::dispatch::{CredentialSubsystem, dispatch};
use super::request::{SelectionPolicy, shape_registration};
use super::response::CeremonyResult;
use super::types::RegistrationOptions;

/// Runs one registration ceremony under the configured selection policy.
///
/// `request` is the inbound `{ "publicKey": <RegistrationOptions> }`
/// document. Returns the canonical registration response envelope, or one
/// error from the closed taxonomy. Decode failures never reach the
/// subsystem.
pub async fn create_passkey<S>(subsystem: &S, request: &Value) -> Result<Value, CeremonyError>
where
    S: CredentialSubsystem + ?Sized,
{
    create_passkey_with_policy(subsystem, request, *PASSKEY_SELECTION_POLICY).await
}

/// Same as [`create_passkey`] with an explicit selection policy, for callers
/// that decide platform-bound vs. security-key per call.
pub async fn create_passkey_with_policy<S>(
    subsystem: &S,
    request: &Value,
    policy: SelectionPolicy,
) -> Result<Value, CeremonyError>
where
    S: CredentialSubsystem + ?Sized,
{
    let public_key = request
        .get("publicKey")
        .filter(|v| !v.is_null())
        .ok_or_else(|| CeremonyError::MissingField("publicKey".to_string()))?;

    let options = RegistrationOptions::from_value(public_key)?;
    tracing::debug!("Registration options: {:?}", options);

    let bundle = shape_registration(&options, policy, *PASSKEY_PLATFORM_TIER)?;
    let raw = dispatch(subsystem, &bundle).await?;
    let result = CeremonyResult::from_raw(raw)?;

    serde_json::to_value(&result).map_err(|e| CeremonyError::Unknown(e.to_string()))
}
