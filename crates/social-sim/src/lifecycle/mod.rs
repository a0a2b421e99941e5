//! # System Lifecycle & Orchestration
//!
//! Starting, wiring and shutting down the backend.
//!
//! ## Stores and engines
//!
//! Every engine runs its own pools, but all engines share the same
//! [`Stores`], so an entity created through one engine is visible through
//! every other. Within a store, concurrent pool members are serialized by the
//! store's reader/writer lock.
//!
//! ```rust,ignore
//! let backend = Backend::start(BackendConfig::default(), 3)?;
//! let alice = backend.client(0);
//! alice.register("alice", "pw").await?;
//! backend.shutdown().await;
//! ```
//!
//! ## Graceful Shutdown
//!
//! Pool members reference each other (users ask posts for feeds, posts push
//! karma to users), so dropping addresses never closes their channels.
//! Shutdown is explicit instead: each engine is sent a stop signal, and the
//! engine stops and joins its pool members before it exits.
//!
//! ## Observability & Tracing
//!
//! [`setup_tracing`] installs the subscriber; see [`actor_runtime::tracing`].

pub mod backend;

pub use actor_runtime::tracing::setup_tracing;
pub use backend::*;
