//! Sync reconciler — pulls the remote snapshot and replaces the local grid
//! when it differs.
//!
//! Each pull is an independent attempt; there is no backoff and no retry
//! budget. Last writer wins across devices.

use std::sync::{Mutex, PoisonError};

use timer24h_domain::slot::SlotGrid;
use timer24h_domain::storage_key;

use crate::ports::{LocalStore, RemoteDocumentStore, RemoteMessageStore};
use crate::services::persistence::{PersistenceChain, Tier};

/// Result of a single reconciliation pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Persistence is disabled, the key is device-local or no live session
    /// exists.
    Skipped,
    /// No remote tier holds a snapshot for the key.
    NoRemoteState,
    /// The remote snapshot matches the in-memory grid.
    Unchanged,
    /// The grid was replaced with the snapshot from `Tier`.
    Replaced(Tier),
}

/// Periodic pull of the shared schedule.
pub struct SyncReconciler<'a, D, M, L> {
    chain: &'a PersistenceChain<D, M, L>,
}

impl<'a, D, M, L> SyncReconciler<'a, D, M, L>
where
    D: RemoteDocumentStore,
    M: RemoteMessageStore,
    L: LocalStore,
{
    pub fn new(chain: &'a PersistenceChain<D, M, L>) -> Self {
        Self { chain }
    }

    /// Run one pull for `key`, replacing `grid` wholesale on difference.
    pub async fn pull(&self, key: &str, save_state: bool, grid: &Mutex<SlotGrid>) -> ReconcileOutcome {
        if !save_state || storage_key::is_default(key) || !self.chain.has_live_session() {
            return ReconcileOutcome::Skipped;
        }

        let Some(loaded) = self.chain.read_remote(key).await else {
            return ReconcileOutcome::NoRemoteState;
        };

        let mut current = grid.lock().unwrap_or_else(PoisonError::into_inner);
        if *current == loaded.snapshot.time_slots {
            return ReconcileOutcome::Unchanged;
        }
        *current = loaded.snapshot.time_slots;
        tracing::info!(tier = %loaded.tier, key, "schedule replaced by remote copy");
        ReconcileOutcome::Replaced(loaded.tier)
    }
}
