//! Persistence tier chain — ordered fallback over the three storage tiers.
//!
//! Writes and reads walk the tiers highest priority first and stop at the
//! first success. Failures are logged and fall through; nothing here returns
//! an error to the caller.

use serde::Serialize;

use timer24h_domain::config::CardConfig;
use timer24h_domain::error::TimerError;
use timer24h_domain::snapshot::PersistedSnapshot;
use timer24h_domain::storage_key;

use crate::ports::{LocalStore, RemoteDocumentStore, RemoteMessageStore};

/// Title of the message used as the degraded remote channel.
pub const MESSAGE_TITLE: &str = "Timer 24H Card Data";

/// Remote tiers, in priority order.
pub const REMOTE_TIERS: [Tier; 2] = [Tier::Document, Tier::Message];

/// One place a snapshot can be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Document,
    Message,
    Local,
}

impl Tier {
    /// Whether this tier is shared with other devices.
    #[must_use]
    pub fn is_remote(self) -> bool {
        !matches!(self, Self::Local)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Document => "document",
            Self::Message => "message",
            Self::Local => "local",
        };
        f.write_str(name)
    }
}

/// Where and how a schedule is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageTarget {
    pub key: String,
    pub allow_local_fallback: bool,
}

impl StorageTarget {
    /// Tiers to try, in order.
    ///
    /// The shared default key stays on the device: every keyless widget of an
    /// account would otherwise overwrite the same remote document.
    #[must_use]
    pub fn tiers(&self) -> Vec<Tier> {
        let mut tiers = if storage_key::is_default(&self.key) {
            Vec::new()
        } else {
            REMOTE_TIERS.to_vec()
        };
        if self.allow_local_fallback {
            tiers.push(Tier::Local);
        }
        tiers
    }
}

impl From<&CardConfig> for StorageTarget {
    fn from(config: &CardConfig) -> Self {
        Self {
            key: config.storage_key.clone(),
            allow_local_fallback: config.allow_local_fallback,
        }
    }
}

/// A snapshot together with the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub tier: Tier,
    pub snapshot: PersistedSnapshot,
}

/// Ordered fallback over document, message and local stores.
pub struct PersistenceChain<D, M, L> {
    documents: D,
    messages: M,
    local: L,
}

impl<D, M, L> PersistenceChain<D, M, L>
where
    D: RemoteDocumentStore,
    M: RemoteMessageStore,
    L: LocalStore,
{
    /// Create a chain over the given stores.
    pub fn new(documents: D, messages: M, local: L) -> Self {
        Self {
            documents,
            messages,
            local,
        }
    }

    /// Whether any remote tier has a live session.
    pub fn has_live_session(&self) -> bool {
        self.documents.is_connected() || self.messages.is_connected()
    }

    /// Write `snapshot`, returning the tier that accepted it.
    ///
    /// `None` means every permitted tier failed or was unavailable.
    pub async fn write(&self, target: &StorageTarget, snapshot: &PersistedSnapshot) -> Option<Tier> {
        let text = match snapshot.encode() {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(%err, "failed to encode schedule");
                return None;
            }
        };

        for tier in target.tiers() {
            if !self.is_available(tier) {
                tracing::debug!(%tier, "tier has no live session, skipping");
                continue;
            }
            match self.write_tier(tier, &target.key, &text).await {
                Ok(()) => {
                    tracing::info!(%tier, key = %target.key, "schedule saved");
                    return Some(tier);
                }
                Err(err) => {
                    tracing::warn!(%tier, key = %target.key, %err, "write failed, trying next tier");
                }
            }
        }

        tracing::warn!(key = %target.key, "schedule not persisted on any tier");
        None
    }

    /// Read the first saved snapshot, walking every permitted tier.
    pub async fn read(&self, target: &StorageTarget) -> Option<Loaded> {
        self.read_tiers(&target.tiers(), &target.key).await
    }

    /// Read the first saved snapshot from the remote tiers only.
    pub async fn read_remote(&self, key: &str) -> Option<Loaded> {
        self.read_tiers(&REMOTE_TIERS, key).await
    }

    async fn read_tiers(&self, tiers: &[Tier], key: &str) -> Option<Loaded> {
        for &tier in tiers {
            if !self.is_available(tier) {
                continue;
            }
            match self.read_tier(tier, key).await {
                Ok(Some(snapshot)) => {
                    tracing::debug!(%tier, key, "saved schedule found");
                    return Some(Loaded { tier, snapshot });
                }
                Ok(None) => tracing::debug!(%tier, key, "no saved schedule on tier"),
                Err(err) => tracing::warn!(%tier, key, %err, "read failed, trying next tier"),
            }
        }
        None
    }

    fn is_available(&self, tier: Tier) -> bool {
        match tier {
            Tier::Document => self.documents.is_connected(),
            Tier::Message => self.messages.is_connected(),
            Tier::Local => true,
        }
    }

    async fn write_tier(&self, tier: Tier, key: &str, text: &str) -> Result<(), TimerError> {
        match tier {
            Tier::Document => self.documents.set(key, text).await,
            Tier::Message => self.messages.create(key, MESSAGE_TITLE, text).await,
            Tier::Local => self.local.set(&storage_key::local_key(key), text).await,
        }
    }

    async fn read_tier(&self, tier: Tier, key: &str) -> Result<Option<PersistedSnapshot>, TimerError> {
        let text = match tier {
            Tier::Document => self.documents.get(key).await?,
            Tier::Message => self
                .messages
                .list()
                .await?
                .into_iter()
                .find(|message| message.id == key)
                .map(|message| message.text),
            Tier::Local => self.local.get(&storage_key::local_key(key)).await?,
        };
        text.map(|text| PersistedSnapshot::decode(&text).map_err(TimerError::malformed))
            .transpose()
    }
}
