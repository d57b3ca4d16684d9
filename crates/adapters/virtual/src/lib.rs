//! # timer24h-adapter-virtual
//!
//! Virtual/demo host that stands in for a home-automation hub.
//!
//! ## Provided devices
//!
//! | Entity | Behaviour |
//! |--------|-----------|
//! | `switch.boiler`, `input_boolean.guest_mode` | `turn_on` / `turn_off` / `toggle` |
//! | `light.porch` | `turn_on` (with `brightness`) / `turn_off` |
//! | `climate.living_room` | `set_hvac_mode` |
//! | `script.morning_routine` | one-shot `turn_on` |
//! | `automation.night_mode` | one-shot `trigger` |
//! | `person.dana`, `binary_sensor.hallway_motion` | state set by the simulation |
//!
//! Besides devices the home holds a per-user data store and a notification
//! list, both reachable only while the simulated session is connected, and
//! `input_text` storage helpers that can be deleted through two paths.
//!
//! ## Dependency rule
//!
//! Depends on `timer24h-app` (port traits) and `timer24h-domain` only.

mod devices;
mod error;

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use timer24h_app::ports::{
    ActuatorCommand, ActuatorRegistry, HostPorts, LocalStore, RemoteDocumentStore,
    RemoteMessageStore, ResourceDeletion, StoredMessage,
};
use timer24h_domain::entity::{EntityStates, namespace_of};
use timer24h_domain::error::TimerError;
use timer24h_domain::service::ServiceCall;
use timer24h_domain::storage_key;

pub use devices::{
    VirtualClimate, VirtualDevice, VirtualLight, VirtualSensor, VirtualSwitch, VirtualText,
    VirtualTrigger,
};
pub use error::VirtualError;

/// A persistent notification as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
}

/// The simulated home: devices, user data, notifications.
pub struct VirtualHome {
    connected: AtomicBool,
    devices: RwLock<BTreeMap<String, VirtualDevice>>,
    user_data: Mutex<BTreeMap<String, String>>,
    notifications: Mutex<Vec<Notification>>,
    calls: Mutex<Vec<ServiceCall>>,
}

impl Default for VirtualHome {
    fn default() -> Self {
        let home = Self::empty(true);
        home.add_device(VirtualDevice::Switch(VirtualSwitch::new("switch.boiler")));
        home.add_device(VirtualDevice::Switch(VirtualSwitch::new(
            "input_boolean.guest_mode",
        )));
        home.add_device(VirtualDevice::Light(VirtualLight::new("light.porch")));
        home.add_device(VirtualDevice::Climate(VirtualClimate::new(
            "climate.living_room",
        )));
        home.add_device(VirtualDevice::Trigger(VirtualTrigger::script(
            "script.morning_routine",
        )));
        home.add_device(VirtualDevice::Trigger(VirtualTrigger::automation(
            "automation.night_mode",
        )));
        home.add_device(VirtualDevice::Sensor(VirtualSensor::new("person.dana", "home")));
        home.add_device(VirtualDevice::Sensor(VirtualSensor::new(
            "binary_sensor.hallway_motion",
            "off",
        )));
        home
    }
}

impl VirtualHome {
    /// A home without any device.
    #[must_use]
    pub fn empty(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
            devices: RwLock::new(BTreeMap::new()),
            user_data: Mutex::new(BTreeMap::new()),
            notifications: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add (or replace) a device.
    pub fn add_device(&self, device: VirtualDevice) {
        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        devices.insert(device.entity_id().to_string(), device);
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
        tracing::info!(connected, "virtual session changed");
    }

    #[must_use]
    pub fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Current state of one entity.
    #[must_use]
    pub fn state_of(&self, entity_id: &str) -> Option<String> {
        self.read_devices().get(entity_id).map(VirtualDevice::state)
    }

    /// Set the state of a sensor, as the outside world would.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::UnknownEntity`] when no sensor has that id.
    pub fn set_sensor(&self, entity_id: &str, state: &str) -> Result<(), VirtualError> {
        match self.read_devices().get(entity_id) {
            Some(VirtualDevice::Sensor(sensor)) => {
                sensor.set_state(state);
                Ok(())
            }
            _ => Err(VirtualError::UnknownEntity(entity_id.to_string())),
        }
    }

    /// Every service call the home accepted, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<ServiceCall> {
        lock(&self.calls).clone()
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }

    /// Value of a user-data entry.
    #[must_use]
    pub fn user_data(&self, key: &str) -> Option<String> {
        lock(&self.user_data).get(key).cloned()
    }

    fn read_devices(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, VirtualDevice>> {
        self.devices.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_session(&self) -> Result<(), VirtualError> {
        if self.connected() {
            Ok(())
        } else {
            Err(VirtualError::Disconnected)
        }
    }

    /// Owned keys get an `input_text` helper the first time they are written.
    fn ensure_helper(&self, key: &str) {
        if !storage_key::is_owned(key) || self.read_devices().contains_key(key) {
            return;
        }
        tracing::debug!(key, "storage helper created");
        self.add_device(VirtualDevice::Text(VirtualText::new(key)));
    }

    fn call(&self, call: &ServiceCall) -> Result<(), VirtualError> {
        self.ensure_session()?;
        let entity_id = call.entity_ref().unwrap_or_default();
        let devices = self.read_devices();
        let device = devices
            .get(entity_id)
            .ok_or_else(|| VirtualError::UnknownEntity(entity_id.to_string()))?;
        if namespace_of(entity_id) != call.namespace {
            return Err(VirtualError::unsupported(entity_id, &call.to_string()));
        }
        device.handle_service(&call.verb, &call.params)?;
        lock(&self.calls).push(call.clone());
        tracing::debug!(%call, entity_id, "virtual service call handled");
        Ok(())
    }

    fn remove_helper(&self, resource: &str) -> Result<(), VirtualError> {
        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        match devices.get(resource) {
            Some(VirtualDevice::Text(_)) => {
                devices.remove(resource);
                tracing::info!(resource, "storage helper deleted");
                Ok(())
            }
            _ => Err(VirtualError::UnknownEntity(resource.to_string())),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RemoteDocumentStore for VirtualHome {
    fn is_connected(&self) -> bool {
        self.connected()
    }

    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, TimerError>> + Send {
        let result = self
            .ensure_session()
            .map(|()| self.user_data(key))
            .map_err(TimerError::unavailable);
        async { result }
    }

    fn set(&self, key: &str, text: &str) -> impl Future<Output = Result<(), TimerError>> + Send {
        let result = self.ensure_session().map(|()| {
            lock(&self.user_data).insert(key.to_string(), text.to_string());
            self.ensure_helper(key);
        });
        async { result.map_err(TimerError::unavailable) }
    }
}

impl RemoteMessageStore for VirtualHome {
    fn is_connected(&self) -> bool {
        self.connected()
    }

    fn list(&self) -> impl Future<Output = Result<Vec<StoredMessage>, TimerError>> + Send {
        let result = self.ensure_session().map(|()| {
            self.notifications()
                .into_iter()
                .map(|notification| StoredMessage {
                    id: notification.id,
                    text: notification.message,
                })
                .collect()
        });
        async { result.map_err(TimerError::unavailable) }
    }

    fn create(
        &self,
        id: &str,
        title: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), TimerError>> + Send {
        let result = self.ensure_session().map(|()| {
            let mut notifications = lock(&self.notifications);
            notifications.retain(|notification| notification.id != id);
            notifications.push(Notification {
                id: id.to_string(),
                title: title.to_string(),
                message: text.to_string(),
            });
            drop(notifications);
            self.ensure_helper(id);
        });
        async { result.map_err(TimerError::unavailable) }
    }
}

impl ActuatorRegistry for VirtualHome {
    fn snapshot(&self) -> EntityStates {
        self.read_devices()
            .iter()
            .map(|(entity_id, device)| (entity_id.clone(), device.state()))
            .collect()
    }
}

impl ActuatorCommand for VirtualHome {
    fn invoke(&self, call: ServiceCall) -> impl Future<Output = Result<(), TimerError>> + Send {
        let result = self
            .call(&call)
            .map_err(|err| TimerError::ActuatorUnreachable {
                actuator: call.entity_ref().unwrap_or_default().to_string(),
                source: err.into(),
            });
        async { result }
    }
}

impl ResourceDeletion for VirtualHome {
    /// Registry removal; needs a live session.
    fn delete_primary(&self, resource: &str) -> impl Future<Output = Result<(), TimerError>> + Send {
        let result = self
            .ensure_session()
            .and_then(|()| self.remove_helper(resource))
            .map_err(|err| deletion_failed(resource, err));
        async { result }
    }

    /// Helper-domain removal; works without a session.
    fn delete_fallback(
        &self,
        resource: &str,
    ) -> impl Future<Output = Result<(), TimerError>> + Send {
        let result = self
            .remove_helper(resource)
            .map_err(|err| deletion_failed(resource, err));
        async { result }
    }
}

fn deletion_failed(resource: &str, err: VirtualError) -> TimerError {
    TimerError::DeletionFailed {
        resource: resource.to_string(),
        source: err.into(),
    }
}

/// [`HostPorts`] over a shared [`VirtualHome`] and any local store.
#[derive(Clone)]
pub struct VirtualHost<L> {
    home: Arc<VirtualHome>,
    local: L,
}

impl<L> VirtualHost<L> {
    pub fn new(home: Arc<VirtualHome>, local: L) -> Self {
        Self { home, local }
    }

    #[must_use]
    pub fn home(&self) -> &Arc<VirtualHome> {
        &self.home
    }
}

impl<L: LocalStore + Clone + 'static> HostPorts for VirtualHost<L> {
    type Documents = Arc<VirtualHome>;
    type Messages = Arc<VirtualHome>;
    type Local = L;
    type Registry = Arc<VirtualHome>;
    type Commands = Arc<VirtualHome>;
    type Deletion = Arc<VirtualHome>;

    fn documents(&self) -> Self::Documents {
        Arc::clone(&self.home)
    }
    fn messages(&self) -> Self::Messages {
        Arc::clone(&self.home)
    }
    fn local(&self) -> Self::Local {
        self.local.clone()
    }
    fn registry(&self) -> Self::Registry {
        Arc::clone(&self.home)
    }
    fn commands(&self) -> Self::Commands {
        Arc::clone(&self.home)
    }
    fn deletion(&self) -> Self::Deletion {
        Arc::clone(&self.home)
    }
}
