//! Application services — the engine's collaborators.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod dispatcher;
pub mod lifecycle;
pub mod persistence;
pub mod reconciler;
