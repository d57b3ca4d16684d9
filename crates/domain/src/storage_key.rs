//! Storage keys — naming of the remote resource that holds a schedule.
//!
//! Keys generated here embed [`OWNED_KEY_MARKER`], which is how teardown
//! recognises a resource it is allowed to delete.

use crate::time::Timestamp;

/// Marker embedded in every generated key.
pub const OWNED_KEY_MARKER: &str = "timer_24h_card_";

/// Namespace of the helper entity that backs a generated key.
pub const HELPER_NAMESPACE: &str = "input_text";

/// Key used when no key was supplied and generation is disabled.
pub const DEFAULT_KEY: &str = "default";

/// Prefix of the key used in the local device store.
const LOCAL_KEY_PREFIX: &str = "timer-24h-";

/// Build a key from a timestamp and a random suffix in `0..1000`.
#[must_use]
pub fn format_key(at: Timestamp, suffix: u16) -> String {
    format!(
        "{HELPER_NAMESPACE}.{OWNED_KEY_MARKER}{}_{:03}",
        at.timestamp_millis(),
        suffix % 1000
    )
}

/// Generate a fresh, globally unique key from the current time.
#[must_use]
pub fn generate() -> String {
    let suffix = uuid::Uuid::new_v4().as_u128() % 1000;
    // suffix < 1000 always fits
    format_key(crate::time::now(), u16::try_from(suffix).unwrap_or_default())
}

/// Whether the key was generated by this widget class.
#[must_use]
pub fn is_owned(key: &str) -> bool {
    key.contains(OWNED_KEY_MARKER)
}

/// Whether `key` is the shared fallback key, which never reaches the remote
/// tiers.
#[must_use]
pub fn is_default(key: &str) -> bool {
    key == DEFAULT_KEY
}

/// Key of the same schedule in the local device store.
#[must_use]
pub fn local_key(key: &str) -> String {
    format!("{LOCAL_KEY_PREFIX}{key}")
}
