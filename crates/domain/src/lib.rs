//! # timer24h-domain
//!
//! Pure domain model for the timer24h activation scheduler.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps, entity-state snapshots
//! - Define the **slot grid** (48 half-hour slots, each armed or not)
//! - Define **activation** rules (schedule verdict ∧ sensor verdict)
//! - Define the **card configuration** and its field-by-field validation
//! - Define the **persisted snapshot** document format and storage keys
//! - Define **actuator classes** and the service calls they translate to
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod activation;
pub mod actuator;
pub mod config;
pub mod entity;
pub mod service;
pub mod slot;
pub mod snapshot;
pub mod storage_key;
