//! # Clients
//!
//! Typed wrappers that hide message construction and reply plumbing.

pub mod engine_client;

pub use engine_client::*;
