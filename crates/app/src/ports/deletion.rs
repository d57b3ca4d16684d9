//! Resource deletion port — removing the storage helper from the host.

use std::future::Future;
use std::sync::Arc;

use timer24h_domain::error::TimerError;

/// Two independent ways of deleting a host-side resource.
///
/// The fallback is only attempted when the primary path fails.
pub trait ResourceDeletion: Send + Sync {
    fn delete_primary(&self, resource: &str) -> impl Future<Output = Result<(), TimerError>> + Send;

    fn delete_fallback(
        &self,
        resource: &str,
    ) -> impl Future<Output = Result<(), TimerError>> + Send;
}

impl<T: ResourceDeletion> ResourceDeletion for Arc<T> {
    fn delete_primary(&self, resource: &str) -> impl Future<Output = Result<(), TimerError>> + Send {
        (**self).delete_primary(resource)
    }

    fn delete_fallback(
        &self,
        resource: &str,
    ) -> impl Future<Output = Result<(), TimerError>> + Send {
        (**self).delete_fallback(resource)
    }
}
