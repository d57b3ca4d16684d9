//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the engine and the host it runs in.
//! They are defined here (in `app`) so that both the engine and the adapter
//! layer can depend on them without creating circular dependencies.

pub mod actuator;
pub mod deletion;
pub mod host;
pub mod store;

pub use actuator::{ActuatorCommand, ActuatorRegistry};
pub use deletion::ResourceDeletion;
pub use host::HostPorts;
pub use store::{LocalStore, RemoteDocumentStore, RemoteMessageStore, StoredMessage};
