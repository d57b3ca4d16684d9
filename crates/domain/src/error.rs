//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`TimerError`]
//! at port boundaries. Persistence and dispatch errors are logged and
//! absorbed by the engine; they never reach the interaction path.

/// Boxed error used to carry adapter-specific causes across port boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for timer24h.
#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    /// The raw configuration, or one of its fields, is unusable.
    #[error("invalid configuration")]
    ConfigInvalid(#[from] ConfigIssue),

    /// A slot sequence violated the grid invariants.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A storage tier's backend could not be reached.
    #[error("store unavailable")]
    StoreUnavailable(#[source] BoxError),

    /// A storage tier returned data that could not be decoded.
    #[error("store returned malformed data")]
    StoreMalformed(#[source] BoxError),

    /// A command sent to a downstream actuator failed.
    #[error("actuator {actuator} unreachable")]
    ActuatorUnreachable {
        actuator: String,
        #[source]
        source: BoxError,
    },

    /// Removing the remote storage resource failed.
    #[error("failed to delete storage resource {resource}")]
    DeletionFailed {
        resource: String,
        #[source]
        source: BoxError,
    },
}

impl TimerError {
    /// Wrap a backend error as [`TimerError::StoreUnavailable`].
    pub fn unavailable(err: impl Into<BoxError>) -> Self {
        Self::StoreUnavailable(err.into())
    }

    /// Wrap a decoding error as [`TimerError::StoreMalformed`].
    pub fn malformed(err: impl Into<BoxError>) -> Self {
        Self::StoreMalformed(err.into())
    }
}

/// A problem found while validating a raw configuration document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigIssue {
    /// The configuration is not a JSON object at all.
    #[error("configuration must be an object")]
    NotAnObject,

    /// A field was present but malformed; it was replaced by its default.
    #[error("field `{0}` has an invalid value")]
    InvalidField(&'static str),
}

/// Grid invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The sequence does not contain exactly one slot per half hour.
    #[error("expected {expected} slots, got {actual}")]
    SlotCount { expected: usize, actual: usize },

    /// A slot is not at its canonical position.
    #[error("slot {index} is {hour:02}:{minute:02}, expected {expected_hour:02}:{expected_minute:02}")]
    SlotOutOfOrder {
        index: usize,
        hour: u8,
        minute: u8,
        expected_hour: u8,
        expected_minute: u8,
    },
}
