//! Storage ports — the three places a schedule snapshot can live.
//!
//! Two of them are remote and depend on a live session with the host
//! ([`RemoteDocumentStore`], [`RemoteMessageStore`]); the third is
//! device-local and always reachable ([`LocalStore`]).

use std::future::Future;
use std::sync::Arc;

use timer24h_domain::error::TimerError;

/// Shared key-value documents held by the host, visible to every device.
pub trait RemoteDocumentStore: Send + Sync {
    /// Whether a live session with the host exists right now.
    fn is_connected(&self) -> bool;

    /// Fetch the text stored under `key`. `Ok(None)` means absent.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, TimerError>> + Send;

    /// Store `text` under `key`, replacing any previous value.
    fn set(&self, key: &str, text: &str) -> impl Future<Output = Result<(), TimerError>> + Send;
}

/// A message as returned by [`RemoteMessageStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: String,
    pub text: String,
}

/// Host-side message/notification store, addressed by message id.
///
/// Creating a message with an id that already exists replaces it.
pub trait RemoteMessageStore: Send + Sync {
    fn is_connected(&self) -> bool;

    fn list(&self) -> impl Future<Output = Result<Vec<StoredMessage>, TimerError>> + Send;

    fn create(
        &self,
        id: &str,
        title: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), TimerError>> + Send;
}

/// Device-local durable key-value storage. Not shared across devices.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, TimerError>> + Send;

    fn set(&self, key: &str, text: &str) -> impl Future<Output = Result<(), TimerError>> + Send;
}

impl<T: RemoteDocumentStore> RemoteDocumentStore for Arc<T> {
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, TimerError>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, text: &str) -> impl Future<Output = Result<(), TimerError>> + Send {
        (**self).set(key, text)
    }
}

impl<T: RemoteMessageStore> RemoteMessageStore for Arc<T> {
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn list(&self) -> impl Future<Output = Result<Vec<StoredMessage>, TimerError>> + Send {
        (**self).list()
    }

    fn create(
        &self,
        id: &str,
        title: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), TimerError>> + Send {
        (**self).create(id, title, text)
    }
}

impl<T: LocalStore> LocalStore for Arc<T> {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, TimerError>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, text: &str) -> impl Future<Output = Result<(), TimerError>> + Send {
        (**self).set(key, text)
    }
}
