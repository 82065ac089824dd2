use std::{env, sync::LazyLock};

use super::main::{PlatformTier, SelectionPolicy};

/// Fallback relying-party identifier applied when the inbound options omit
/// `rp.id` (registration) or `rpId` (authentication).
pub(super) static PASSKEY_RP_ID: LazyLock<Option<String>> =
    LazyLock::new(|| env::var("PASSKEY_RP_ID").ok());

pub(super) static PASSKEY_SELECTION_POLICY: LazyLock<SelectionPolicy> =
    LazyLock::new(|| selection_policy_from(env::var("PASSKEY_SELECTION_POLICY").ok()));

/// Capability tier of the platform credential API generation. Optional
/// fields above the active tier are silently omitted by the request shaper.
pub(super) static PASSKEY_PLATFORM_TIER: LazyLock<PlatformTier> =
    LazyLock::new(|| platform_tier_from(env::var("PASSKEY_PLATFORM_TIER").ok()));

/// When true, unrecognized enum text in inbound options fails decode instead
/// of falling back to the documented defaults.
pub(super) static PASSKEY_STRICT_OPTION_VOCAB: LazyLock<bool> =
    LazyLock::new(|| strict_vocab_from(env::var("PASSKEY_STRICT_OPTION_VOCAB").ok()));

fn selection_policy_from(value: Option<String>) -> SelectionPolicy {
    match value {
        None => SelectionPolicy::PlatformOnly,
        Some(v) => match v.to_lowercase().as_str() {
            "platform" => SelectionPolicy::PlatformOnly,
            "security-key" => SelectionPolicy::SecurityKeyOnly,
            "both" => SelectionPolicy::Both,
            invalid => {
                tracing::warn!(
                    "Invalid selection policy: {}. Using default 'platform'",
                    invalid
                );
                SelectionPolicy::PlatformOnly
            }
        },
    }
}

fn platform_tier_from(value: Option<String>) -> PlatformTier {
    match value {
        None => PlatformTier::Full,
        Some(v) => match v.to_lowercase().as_str() {
            "baseline" => PlatformTier::Baseline,
            "large-blob" => PlatformTier::LargeBlob,
            "full" => PlatformTier::Full,
            invalid => {
                tracing::warn!("Invalid platform tier: {}. Using default 'full'", invalid);
                PlatformTier::Full
            }
        },
    }
}

fn strict_vocab_from(value: Option<String>) -> bool {
    value
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false)
}
