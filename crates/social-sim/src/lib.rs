//! # Social Sim
//!
//! A Reddit-style social platform built from actors, plus a load simulation
//! that drives it with thousands of synthetic users.
//!
//! ## Core Components
//!
//! - **[model]**: plain data types (users, communities, posts, comments,
//!   direct messages, votes) and the read views built from them.
//! - **Domain actors**: [`user_actor`], [`community_actor`], [`post_actor`],
//!   [`comment_actor`] and [`dm_actor`]. Each kind runs as a pool of actors
//!   sharing one locked store.
//! - **[engine]**: the stateless router that forwards requests to pool
//!   members, honouring pins to a specific member.
//! - **[clients]**: [`EngineClient`](clients::EngineClient), the typed API
//!   over an engine.
//! - **[lifecycle]**: [`Backend`](lifecycle::Backend), which starts, wires and
//!   stops the whole system.
//! - **[simulation]**: the controller, synthetic clients and metrics.
//!
//! ## Cascading deletes
//!
//! Community → posts → comments deletes run as a chain of timeout-bounded
//! requests (see [`cascade`]). A parent is removed only after its children
//! are, and a failed hop leaves everything in place.

pub mod cascade;
pub mod clients;
pub mod comment_actor;
pub mod community_actor;
pub mod config;
pub mod dm_actor;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod pool;
pub mod post_actor;
pub mod simulation;
pub mod user_actor;
