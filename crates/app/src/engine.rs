//! Timer engine — owns the slot grid, the configuration and the periodic
//! evaluation and reconciliation tasks.
//!
//! The engine is driven from two sides: interactions (`toggle`,
//! `set_config`) and its own timers, started by [`TimerEngine::start`] and
//! aborted by [`TimerEngine::stop`]. Persistence and dispatch run in spawned
//! tasks; their failures are logged and never reach the caller.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::NaiveTime;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use timer24h_domain::activation::{self, Verdict};
use timer24h_domain::config::CardConfig;
use timer24h_domain::error::TimerError;
use timer24h_domain::slot::{SlotGrid, TimeSlot};
use timer24h_domain::snapshot::PersistedSnapshot;
use timer24h_domain::time;

use crate::event_bus::{EngineEvent, GridOrigin, InProcessEventBus};
use crate::ports::{ActuatorRegistry, HostPorts};
use crate::services::dispatcher::{ActuatorDispatcher, DispatchReport};
use crate::services::lifecycle::{DEFAULT_CLEANUP_GRACE, LifecycleManager};
use crate::services::persistence::{PersistenceChain, StorageTarget, Tier};
use crate::services::reconciler::{ReconcileOutcome, SyncReconciler};

const EVENT_CAPACITY: usize = 64;

/// Timing knobs of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Period of the activation evaluation. Must be non-zero.
    pub evaluation_interval: Duration,
    /// Period of the remote pull. Must be non-zero.
    pub sync_interval: Duration,
    /// Delay between `stop` and the helper cleanup check.
    pub cleanup_grace: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            evaluation_interval: Duration::from_secs(60),
            sync_interval: Duration::from_secs(60),
            cleanup_grace: DEFAULT_CLEANUP_GRACE,
        }
    }
}

/// Whether the schedule is shared with other devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncIndicator {
    Synced,
    Local,
}

/// Everything a view needs to render the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    pub title: String,
    pub current_slot: TimeSlot,
    pub verdict: Verdict,
    pub sync: SyncIndicator,
    pub active_slots: usize,
    pub slots: Vec<TimeSlot>,
}

/// Outcome of one evaluation.
#[derive(Debug)]
pub struct Tick {
    pub verdict: Verdict,
    /// Set when the verdict changed and actuators are being commanded.
    pub dispatch: Option<JoinHandle<DispatchReport>>,
}

struct Shared<H: HostPorts> {
    config: RwLock<Arc<CardConfig>>,
    grid: Mutex<SlotGrid>,
    chain: PersistenceChain<H::Documents, H::Messages, H::Local>,
    dispatcher: ActuatorDispatcher<H::Registry, H::Commands>,
    registry: H::Registry,
    events: InProcessEventBus,
    last_verdict: Mutex<Option<bool>>,
    last_tier: Mutex<Option<Tier>>,
}

/// The activation scheduler for one widget instance.
pub struct TimerEngine<H: HostPorts> {
    shared: Arc<Shared<H>>,
    lifecycle: Arc<LifecycleManager<H::Registry, H::Deletion>>,
    settings: EngineSettings,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<H: HostPorts> TimerEngine<H> {
    /// Build a detached engine with an empty grid.
    pub fn new(host: &H, config: CardConfig, settings: EngineSettings) -> Self {
        let shared = Shared {
            config: RwLock::new(Arc::new(config)),
            grid: Mutex::new(SlotGrid::new()),
            chain: PersistenceChain::new(host.documents(), host.messages(), host.local()),
            dispatcher: ActuatorDispatcher::new(host.registry(), host.commands()),
            registry: host.registry(),
            events: InProcessEventBus::new(EVENT_CAPACITY),
            last_verdict: Mutex::new(None),
            last_tier: Mutex::new(None),
        };
        Self {
            shared: Arc::new(shared),
            lifecycle: Arc::new(LifecycleManager::new(
                host.registry(),
                host.deletion(),
                settings.cleanup_grace,
            )),
            settings,
            tasks: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> Arc<CardConfig> {
        self.shared.config()
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.shared.events.subscribe()
    }

    /// Validate a raw configuration, apply it and load the saved schedule.
    ///
    /// Malformed fields fall back to their defaults and are logged. A document
    /// without a storage key keeps the current one, so reconfiguring never
    /// moves the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::ConfigInvalid`] when `raw` is not an object.
    pub async fn set_config(&self, raw: &serde_json::Value) -> Result<Arc<CardConfig>, TimerError> {
        let current = self.config();
        let parsed = CardConfig::from_value_with(raw, || current.storage_key.clone())?;
        for issue in &parsed.dropped {
            tracing::warn!(%issue, "configuration field ignored");
        }
        self.apply_config(parsed.config);
        self.load_saved_state().await;
        Ok(self.config())
    }

    /// Replace the configuration without touching the grid.
    pub fn apply_config(&self, config: CardConfig) {
        tracing::info!(
            title = %config.title,
            key = %config.storage_key,
            entities = config.entities.len(),
            sensors = config.home_sensors.len(),
            "configuration applied"
        );
        *self
            .shared
            .config
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
        // new actuator set, next evaluation dispatches again
        *self.shared.lock_last_verdict() = None;
    }

    /// Load the saved schedule through every permitted tier.
    ///
    /// Returns the tier it came from; `None` leaves the grid unchanged.
    pub async fn load_saved_state(&self) -> Option<Tier> {
        self.shared.load().await
    }

    /// Flip the slot starting at `hour:minute` and persist the new grid.
    ///
    /// Returns the new flag, or `None` when no slot starts there. The write
    /// runs in the background.
    pub fn toggle(&self, hour: u8, minute: u8) -> Option<bool> {
        let (active, snapshot) = {
            let mut grid = self.shared.lock_grid();
            let active = grid.toggle(hour, minute)?;
            (active, PersistedSnapshot::capture(&grid, time::now()))
        };
        tracing::debug!(hour, minute, active, "slot toggled");
        self.shared.events.publish(EngineEvent::GridChanged {
            origin: GridOrigin::User,
        });

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move { shared.persist(snapshot).await });
        Some(active)
    }

    #[must_use]
    pub fn grid(&self) -> SlotGrid {
        self.shared.lock_grid().clone()
    }

    /// Evaluate the verdict at `now` without dispatching.
    #[must_use]
    pub fn evaluate_at(&self, now: NaiveTime) -> Verdict {
        self.shared.evaluate(&now)
    }

    /// Evaluate at `now` and command actuators if the verdict changed.
    pub fn tick_at(&self, now: NaiveTime) -> Tick {
        self.shared.tick(now)
    }

    /// Run one remote pull immediately.
    pub async fn sync_now(&self) -> ReconcileOutcome {
        self.shared.reconcile().await
    }

    #[must_use]
    pub fn sync_indicator(&self) -> SyncIndicator {
        self.shared.sync_indicator()
    }

    /// Snapshot of the engine as seen at `now`.
    #[must_use]
    pub fn status_at(&self, now: NaiveTime) -> EngineStatus {
        let config = self.config();
        let sync = self.shared.sync_indicator();
        let states = self.shared.registry.snapshot();
        let grid = self.shared.lock_grid();
        EngineStatus {
            title: config.title.clone(),
            current_slot: *grid.current_slot(&now),
            verdict: activation::evaluate(&grid, &config, &states, &now),
            sync,
            active_slots: grid.active_count(),
            slots: grid.snapshot(),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.lock_tasks().is_empty()
    }

    /// Attach: cancel any pending cleanup and start both periodic tasks.
    ///
    /// The first evaluation runs immediately and always dispatches. Calling
    /// `start` on a running engine restarts the tasks.
    pub fn start(&self) {
        self.lifecycle.attach();
        *self.shared.lock_last_verdict() = None;

        let mut tasks = self.lock_tasks();
        for task in tasks.drain(..) {
            task.abort();
        }

        let shared = Arc::clone(&self.shared);
        let period = self.settings.evaluation_interval;
        tasks.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                shared.tick(time::local_time_of_day());
            }
        }));

        let shared = Arc::clone(&self.shared);
        let period = self.settings.sync_interval;
        tasks.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                shared.reconcile().await;
            }
        }));

        tracing::info!(
            evaluation = ?self.settings.evaluation_interval,
            sync = ?self.settings.sync_interval,
            "engine started"
        );
    }

    /// Detach: abort both periodic tasks and schedule the helper cleanup.
    pub fn stop(&self) {
        for task in self.lock_tasks().drain(..) {
            task.abort();
        }
        self.lifecycle.detach(self.config().storage_key.clone());
        tracing::info!("engine stopped");
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H: HostPorts> Drop for TimerEngine<H> {
    fn drop(&mut self) {
        for task in self.lock_tasks().drain(..) {
            task.abort();
        }
    }
}

impl<H: HostPorts> Shared<H> {
    fn config(&self) -> Arc<CardConfig> {
        Arc::clone(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn lock_grid(&self) -> std::sync::MutexGuard<'_, SlotGrid> {
        self.grid.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_last_verdict(&self) -> std::sync::MutexGuard<'_, Option<bool>> {
        self.last_verdict.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_last_tier(&self, tier: Option<Tier>) {
        *self.last_tier.lock().unwrap_or_else(PoisonError::into_inner) = tier;
    }

    fn sync_indicator(&self) -> SyncIndicator {
        let last = *self.last_tier.lock().unwrap_or_else(PoisonError::into_inner);
        match last {
            Some(tier) if tier.is_remote() && self.config().save_state => SyncIndicator::Synced,
            _ => SyncIndicator::Local,
        }
    }

    fn evaluate(&self, now: &NaiveTime) -> Verdict {
        let config = self.config();
        let states = self.registry.snapshot();
        let grid = self.lock_grid();
        activation::evaluate(&grid, &config, &states, now)
    }

    fn tick(self: &Arc<Self>, now: NaiveTime) -> Tick {
        let verdict = self.evaluate(&now);
        let changed = self.lock_last_verdict().replace(verdict.active) != Some(verdict.active);
        if !changed {
            return Tick {
                verdict,
                dispatch: None,
            };
        }

        tracing::info!(
            active = verdict.active,
            schedule = verdict.schedule,
            sensors = verdict.sensors,
            "verdict changed"
        );
        self.events.publish(EngineEvent::VerdictChanged {
            active: verdict.active,
        });

        let config = self.config();
        let shared = Arc::clone(self);
        let dispatch = tokio::spawn(async move {
            shared
                .dispatcher
                .apply(&config.entities, verdict.active)
                .await
        });
        Tick {
            verdict,
            dispatch: Some(dispatch),
        }
    }

    async fn persist(&self, snapshot: PersistedSnapshot) {
        let target = StorageTarget::from(self.config().as_ref());
        let tier = self.chain.write(&target, &snapshot).await;
        self.set_last_tier(tier);
        if let Some(tier) = tier {
            self.events.publish(EngineEvent::Persisted { tier });
        }
    }

    async fn load(&self) -> Option<Tier> {
        let target = StorageTarget::from(self.config().as_ref());
        let Some(loaded) = self.chain.read(&target).await else {
            tracing::info!(key = %target.key, "no saved schedule, keeping current grid");
            return None;
        };

        *self.lock_grid() = loaded.snapshot.time_slots;
        self.set_last_tier(Some(loaded.tier));
        tracing::info!(tier = %loaded.tier, key = %target.key, "saved schedule loaded");
        self.events
            .publish(EngineEvent::StateLoaded { tier: loaded.tier });
        self.events.publish(EngineEvent::GridChanged {
            origin: GridOrigin::Load,
        });
        Some(loaded.tier)
    }

    async fn reconcile(self: &Arc<Self>) -> ReconcileOutcome {
        let config = self.config();
        let outcome = SyncReconciler::new(&self.chain)
            .pull(&config.storage_key, config.save_state, &self.grid)
            .await;
        if let ReconcileOutcome::Replaced(tier) = outcome {
            self.set_last_tier(Some(tier));
            self.events.publish(EngineEvent::GridChanged {
                origin: GridOrigin::Remote,
            });
            self.tick(time::local_time_of_day());
        }
        outcome
    }
}
