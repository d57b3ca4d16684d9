//! Host bundle — everything the engine needs from the outside world.

use super::{
    ActuatorCommand, ActuatorRegistry, LocalStore, RemoteDocumentStore, RemoteMessageStore,
    ResourceDeletion,
};

/// Bundles the concrete port implementations of one host.
///
/// The composition root implements this once; the engine asks for each port
/// when it is built. Implementations usually hand out cheap `Arc` clones of a
/// single shared connection.
pub trait HostPorts: 'static {
    type Documents: RemoteDocumentStore + 'static;
    type Messages: RemoteMessageStore + 'static;
    type Local: LocalStore + 'static;
    type Registry: ActuatorRegistry + 'static;
    type Commands: ActuatorCommand + 'static;
    type Deletion: ResourceDeletion + 'static;

    fn documents(&self) -> Self::Documents;
    fn messages(&self) -> Self::Messages;
    fn local(&self) -> Self::Local;
    fn registry(&self) -> Self::Registry;
    fn commands(&self) -> Self::Commands;
    fn deletion(&self) -> Self::Deletion;
}
