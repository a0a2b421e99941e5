//! Cross-actor calls with deadlines.
//!
//! A cascade (community -> posts -> comments) is a chain of independently
//! locked hops. The deadline is fixed by the first hop and travels with every
//! request, so a child can refuse to commit once its caller has given up.

use crate::error::{DomainError, DomainResult, ACTOR_UNAVAILABLE};
use actor_runtime::{Actor, Addr, Context, Reply};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

pub const DEADLINE_EXCEEDED: &str = "Cascade deadline exceeded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.0
    }

    /// Fails with a timeout once the deadline has passed.
    pub fn check(&self) -> DomainResult<()> {
        if self.expired() {
            Err(DomainError::Timeout(DEADLINE_EXCEEDED.to_string()))
        } else {
            Ok(())
        }
    }
}

/// Requests `target` on behalf of the actor owning `ctx` and flattens the
/// transport and domain failures into one [`DomainResult`].
pub fn ask<S, A, R, F>(
    ctx: &Context<S>,
    target: Option<Addr<A>>,
    make: F,
    timeout: Duration,
) -> impl Future<Output = DomainResult<R>> + Send + 'static
where
    S: Actor,
    A: Actor,
    R: Send + 'static,
    F: FnOnce(Reply<DomainResult<R>>) -> A::Message + Send + 'static,
{
    let request = target.map(|target| ctx.request(&target, make, timeout));
    async move {
        match request {
            Some(request) => request.await?,
            None => Err(DomainError::Unavailable(ACTOR_UNAVAILABLE.to_string())),
        }
    }
}
