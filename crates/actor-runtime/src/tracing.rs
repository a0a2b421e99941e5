//! # Observability & Tracing
//!
//! Structured logging for actor systems built on this runtime.
//!
//! The run loop logs every actor's lifecycle with an `actor_type` field (the
//! short type name) and its `id`, and logs each handled message at `debug`:
//!
//! ```text
//! INFO Actor started actor_type="PostActor" id=pid-14
//! DEBUG Handle actor_type="PostActor" id=pid-14 sender=Some(ActorId(3)) msg=Create { .. }
//! INFO Actor stopped actor_type="PostActor" id=pid-14 handled=212
//! ```
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run      # lifecycle and domain events
//! RUST_LOG=debug cargo run     # full message payloads
//! RUST_LOG=social_sim=debug,actor_runtime=info cargo run
//! ```

/// Installs the global subscriber: `RUST_LOG` filtering, compact output, no module paths.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // actor_type already names the source
        .compact()
        .init();
}
