//! # Actor Runtime
//!
//! A small, typed actor runtime on top of Tokio. Every actor owns its state,
//! has a unique [`ActorId`], and drains an unbounded mailbox one message at a
//! time, while many actors run in parallel.
//!
//! ## Why Actors?
//!
//! - **Isolated state**: an actor's fields are only touched by its own hooks
//! - **Message passing**: actors talk through [`Addr`] handles, never shared references
//! - **Sequential handling**: within one actor, no two handlers ever race
//!
//! **Further Reading**:
//! - [Actor Model (Wikipedia)](https://en.wikipedia.org/wiki/Actor_model)
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Behaviour** ([`Actor`]) - your state and message handling
//! 2. **Runtime** ([`Mailbox`], [`Context`]) - the run loop, timers, deferred effects
//! 3. **Interface** ([`Addr`], [`Reply`]) - sending, requesting, replying
//!
//! ## Messaging Primitives
//!
//! | Primitive | API | Notes |
//! |-----------|-----|-------|
//! | spawn | [`spawn`], [`Mailbox::new`] + [`Mailbox::run`], [`Context::spawn`] | |
//! | fire-and-forget | [`Addr::send`], [`Context::send`] | FIFO per sender/receiver pair |
//! | forward | [`Addr::deliver`] | keeps the original sender |
//! | request/response | [`Addr::request`], [`Context::request`] | bounded by a timeout |
//! | respond | [`Reply::respond`] | consumes the reply handle |
//! | self / sender | [`Context::id`], [`Context::sender`] | |
//! | wake timer | [`Context::set_wake_timer`] | delivers [`Actor::wake`] periodically |
//! | stop | [`Addr::stop`], [`Context::stop`] | needed when addresses form a cycle |
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Messages are processed **sequentially** within an actor
//! - Effects requested through the [`Context`] become visible only after the
//!   handler that requested them returns
//! - A handler that awaits a [`Context::request`] blocks only its own actor
//!
//! ## Testing
//!
//! The [`mock`] module hands out addresses whose messages are captured by the
//! test, which makes it straightforward to simulate stalled or failing peers.

pub mod actor;
pub mod address;
pub mod context;
pub mod error;
pub mod mailbox;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::{Actor, ActorId};
pub use address::{Addr, Undelivered};
pub use context::Context;
pub use error::RuntimeError;
pub use mailbox::{spawn, Mailbox};
pub use message::{Envelope, Reply, Signal};
