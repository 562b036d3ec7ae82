//! Upload-and-storage bridge.
//!
//! Accepts inbound image and file payloads (local temp path or remote URL),
//! validates and optionally resizes them, and persists them to S3-compatible
//! object storage under collision-free keys, returning a public URL.
//! Storage settings are layered: environment defaults overridden by values
//! from a host-provided key-value settings store.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
