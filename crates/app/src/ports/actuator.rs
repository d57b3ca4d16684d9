//! Actuator ports — reading host state and sending commands to it.

use std::future::Future;
use std::sync::Arc;

use timer24h_domain::entity::EntityStates;
use timer24h_domain::error::TimerError;
use timer24h_domain::service::ServiceCall;

/// Read-only view of every entity the host currently knows about.
pub trait ActuatorRegistry: Send + Sync {
    /// Current state of every known entity, keyed by reference.
    fn snapshot(&self) -> EntityStates;
}

/// The host's command surface.
pub trait ActuatorCommand: Send + Sync {
    /// Invoke `call` on the host.
    ///
    /// The call is fire-and-forget from the engine's point of view; failures
    /// are reported and logged, never retried.
    fn invoke(&self, call: ServiceCall) -> impl Future<Output = Result<(), TimerError>> + Send;
}

impl<T: ActuatorRegistry> ActuatorRegistry for Arc<T> {
    fn snapshot(&self) -> EntityStates {
        (**self).snapshot()
    }
}

impl<T: ActuatorCommand> ActuatorCommand for Arc<T> {
    fn invoke(&self, call: ServiceCall) -> impl Future<Output = Result<(), TimerError>> + Send {
        (**self).invoke(call)
    }
}
