//! # timer24h-app
//!
//! Application layer — the timer engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RemoteDocumentStore`, `RemoteMessageStore`, `LocalStore` — the three
//!     persistence tiers
//!   - `ActuatorRegistry`, `ActuatorCommand` — host state and command surface
//!   - `ResourceDeletion` — removal of the storage helper
//!   - `HostPorts` — bundle of the above for one host
//! - Provide the services the engine is built from:
//!   - `PersistenceChain` — ordered write/read fallback over the tiers
//!   - `SyncReconciler` — periodic pull of the shared schedule
//!   - `ActuatorDispatcher` — verdict to concurrent host commands
//!   - `LifecycleManager` — deferred helper cleanup on detach
//! - Provide the driving entry point, `TimerEngine`, and the in-process event bus
//!
//! ## Dependency rule
//! Depends on `timer24h-domain` only (plus `tokio` for tasks, timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod engine;
pub mod event_bus;
pub mod ports;
pub mod services;
