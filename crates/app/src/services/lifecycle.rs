//! Lifecycle manager — deferred removal of the storage helper on detach.
//!
//! Detaching schedules a check after a grace period. A re-attach within the
//! grace period cancels it, so a quick detach/attach cycle (re-render, page
//! navigation) never deletes anything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use timer24h_domain::storage_key;

use crate::ports::{ActuatorRegistry, ResourceDeletion};

/// Default delay between detach and the cleanup check.
pub const DEFAULT_CLEANUP_GRACE: Duration = Duration::from_secs(5);

/// Which deletion path removed the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionPath {
    Primary,
    Fallback,
}

/// Result of a cleanup check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The engine was attached again before the check ran.
    Reattached,
    /// The key does not belong to this widget class.
    NotOwned,
    /// The resource is not present in the registry any more.
    AlreadyGone,
    Deleted(DeletionPath),
    /// Both deletion paths failed.
    Failed,
}

/// Tracks attachment and owns the pending cleanup task.
pub struct LifecycleManager<R, X> {
    registry: R,
    deletion: X,
    grace: Duration,
    attached: AtomicBool,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<R, X> LifecycleManager<R, X>
where
    R: ActuatorRegistry + 'static,
    X: ResourceDeletion + 'static,
{
    /// Create a detached manager.
    pub fn new(registry: R, deletion: X, grace: Duration) -> Self {
        Self {
            registry,
            deletion,
            grace,
            attached: AtomicBool::new(false),
            pending: Mutex::new(None),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Mark attached and cancel any pending cleanup.
    pub fn attach(&self) {
        self.attached.store(true, Ordering::SeqCst);
        if let Some(handle) = self.take_pending() {
            handle.abort();
            tracing::debug!("pending helper cleanup cancelled");
        }
    }

    /// Mark detached and schedule the cleanup check for `key`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn detach(self: &Arc<Self>, key: String) {
        self.attached.store(false, Ordering::SeqCst);
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(this.grace).await;
            this.cleanup(&key).await;
        });
        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Delete the storage helper behind `key` if nothing still needs it.
    pub async fn cleanup(&self, key: &str) -> CleanupOutcome {
        if self.is_attached() {
            return CleanupOutcome::Reattached;
        }
        if !storage_key::is_owned(key) {
            tracing::debug!(key, "storage key not owned, keeping it");
            return CleanupOutcome::NotOwned;
        }
        if !self.registry.snapshot().contains(key) {
            tracing::debug!(key, "storage helper already gone");
            return CleanupOutcome::AlreadyGone;
        }

        tracing::info!(key, "removing storage helper");
        match self.deletion.delete_primary(key).await {
            Ok(()) => return CleanupOutcome::Deleted(DeletionPath::Primary),
            Err(err) => tracing::debug!(key, %err, "primary deletion failed, trying fallback"),
        }
        match self.deletion.delete_fallback(key).await {
            Ok(()) => CleanupOutcome::Deleted(DeletionPath::Fallback),
            Err(err) => {
                tracing::warn!(key, %err, "could not delete storage helper, remove it manually");
                CleanupOutcome::Failed
            }
        }
    }

    fn take_pending(&self) -> Option<JoinHandle<()>> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::dispatcher::tests::StaticRegistry;
    use std::future::Future;
    use timer24h_domain::error::TimerError;

    const OWNED: &str = "input_text.timer_24h_card_1700000000000_042";

    // ── Spy deletion ───────────────────────────────────────────────

    #[derive(Default)]
    pub(crate) struct SpyDeletion {
        pub(crate) primary: Mutex<Vec<String>>,
        pub(crate) fallback: Mutex<Vec<String>>,
        pub(crate) primary_fails: bool,
        pub(crate) fallback_fails: bool,
    }

    impl SpyDeletion {
        pub(crate) fn calls(&self) -> usize {
            self.primary.lock().unwrap().len() + self.fallback.lock().unwrap().len()
        }
    }

    fn outcome(fails: bool, resource: &str) -> Result<(), TimerError> {
        if fails {
            Err(TimerError::DeletionFailed {
                resource: resource.to_string(),
                source: "rejected".into(),
            })
        } else {
            Ok(())
        }
    }

    impl ResourceDeletion for SpyDeletion {
        fn delete_primary(
            &self,
            resource: &str,
        ) -> impl Future<Output = Result<(), TimerError>> + Send {
            self.primary.lock().unwrap().push(resource.to_string());
            let r = outcome(self.primary_fails, resource);
            async { r }
        }
        fn delete_fallback(
            &self,
            resource: &str,
        ) -> impl Future<Output = Result<(), TimerError>> + Send {
            self.fallback.lock().unwrap().push(resource.to_string());
            let r = outcome(self.fallback_fails, resource);
            async { r }
        }
    }

    fn manager(deletion: SpyDeletion) -> Arc<LifecycleManager<StaticRegistry, SpyDeletion>> {
        Arc::new(LifecycleManager::new(
            StaticRegistry::with(&[(OWNED, "{}")]),
            deletion,
            DEFAULT_CLEANUP_GRACE,
        ))
    }

    // ── Tests ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn should_delete_with_primary_path_when_detached() {
        let manager = manager(SpyDeletion::default());

        let outcome = manager.cleanup(OWNED).await;

        assert_eq!(outcome, CleanupOutcome::Deleted(DeletionPath::Primary));
        assert!(manager.deletion.fallback.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_use_fallback_when_primary_fails() {
        let manager = manager(SpyDeletion {
            primary_fails: true,
            ..SpyDeletion::default()
        });

        let outcome = manager.cleanup(OWNED).await;

        assert_eq!(outcome, CleanupOutcome::Deleted(DeletionPath::Fallback));
        assert_eq!(manager.deletion.calls(), 2);
    }

    #[tokio::test]
    async fn should_give_up_once_when_both_paths_fail() {
        let manager = manager(SpyDeletion {
            primary_fails: true,
            fallback_fails: true,
            ..SpyDeletion::default()
        });

        assert_eq!(manager.cleanup(OWNED).await, CleanupOutcome::Failed);
        assert_eq!(manager.deletion.calls(), 2);
    }

    #[tokio::test]
    async fn should_never_delete_unowned_key() {
        let manager = manager(SpyDeletion::default());

        assert_eq!(manager.cleanup("default").await, CleanupOutcome::NotOwned);
        assert_eq!(
            manager.cleanup("input_text.kitchen").await,
            CleanupOutcome::NotOwned
        );
        assert_eq!(manager.deletion.calls(), 0);
    }

    #[tokio::test]
    async fn should_skip_deletion_when_resource_already_gone() {
        let manager = manager(SpyDeletion::default());
        manager.registry.states.lock().unwrap().insert("sensor.x", "1");
        let other = "input_text.timer_24h_card_1_999";

        assert_eq!(manager.cleanup(other).await, CleanupOutcome::AlreadyGone);
        assert_eq!(manager.deletion.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn should_delete_after_grace_period_when_still_detached() {
        let manager = manager(SpyDeletion::default());
        manager.attach();

        manager.detach(OWNED.to_string());
        tokio::time::sleep(DEFAULT_CLEANUP_GRACE + Duration::from_millis(10)).await;

        assert_eq!(manager.deletion.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_delete_when_reattached_within_grace_period() {
        let manager = manager(SpyDeletion::default());
        manager.attach();

        manager.detach(OWNED.to_string());
        tokio::time::sleep(Duration::from_secs(2)).await;
        manager.attach();
        tokio::time::sleep(DEFAULT_CLEANUP_GRACE * 2).await;

        assert_eq!(manager.deletion.calls(), 0);
        assert!(manager.is_attached());
    }
}
