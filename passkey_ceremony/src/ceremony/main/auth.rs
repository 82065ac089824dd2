use serde_json::Value;

use crate::ceremony::config::{PASSKEY_PLATFORM_TIER, PASSKEY_SELECTION_POLICY};
use crate::ceremony::errors::CeremonyError;

use super::dispatch::{CredentialSubsystem, dispatch};
use super::request::{SelectionPolicy, shape_assertion};
use super::response::CeremonyResult;
use super::types::AuthenticationOptions;

/// Runs one authentication ceremony under the configured selection policy.
///
/// `request` is the inbound `{ "publicKey": <AuthenticationOptions> }`
/// document. Returns the canonical assertion response envelope, or one error
/// from the closed taxonomy.
pub async fn authenticate<S>(subsystem: &S, request: &Value) -> Result<Value, CeremonyError>
where
    S: CredentialSubsystem + ?Sized,
{
    authenticate_with_policy(subsystem, request, *PASSKEY_SELECTION_POLICY).await
}

/// Same as [`authenticate`] with an explicit selection policy.
pub async fn authenticate_with_policy<S>(
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

    let options = AuthenticationOptions::from_value(public_key)?;
    tracing::debug!("Authentication options: {:?}", options);

    let bundle = shape_assertion(&options, policy, *PASSKEY_PLATFORM_TIER)?;
    let raw = dispatch(subsystem, &bundle).await?;
    let result = CeremonyResult::from_raw(raw)?;

    serde_json::to_value(&result).map_err(|e| CeremonyError::Unknown(e.to_string()))
}
