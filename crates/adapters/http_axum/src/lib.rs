//! # timer24h-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** that plays the role of the widget's host:
//!   status, slot listing, slot toggling and configuration
//! - Stream engine events over **Server-Sent Events** so views know when to
//!   re-render
//! - Map HTTP requests into engine calls (driving adapter) and engine
//!   results into JSON responses
//!
//! ## Dependency rule
//! Depends on `timer24h-app` (for the engine and port traits) and
//! `timer24h-domain` (for types used in request/response mapping). Never
//! leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
