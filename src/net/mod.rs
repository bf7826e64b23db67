//! Networking modules for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` is the typed client every screen talks through, `http` is the
//! production transport, and `types` defines the wire schema.

pub mod api;
pub mod http;
pub mod types;
