//! Routing primitives shared by the engine and by domain actors that call
//! other pools: a round-robin [`Pool`], the [`Routed`] envelope carrying an
//! optional pinned address, and [`Reject`] for failing a request that could
//! not be delivered.

use crate::error::DomainError;
use actor_runtime::{Actor, ActorId, Addr};

/// A fixed set of interchangeable actors with a rotating cursor.
///
/// Every clone keeps its own cursor, so each caller spreads its own load.
pub struct Pool<A: Actor> {
    members: Vec<Addr<A>>,
    cursor: usize,
}

impl<A: Actor> Clone for Pool<A> {
    fn clone(&self) -> Self {
        Self {
            members: self.members.clone(),
            cursor: self.cursor,
        }
    }
}

impl<A: Actor> std::fmt::Debug for Pool<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("members", &self.members.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<A: Actor> Pool<A> {
    pub fn new(members: Vec<Addr<A>>) -> Self {
        Self { members, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Addr<A>] {
        &self.members
    }

    /// The member under the cursor; advances the cursor.
    pub fn next(&mut self) -> Option<Addr<A>> {
        if self.members.is_empty() {
            return None;
        }
        let member = self.members[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.members.len();
        Some(member)
    }

    pub fn get(&self, id: ActorId) -> Option<Addr<A>> {
        self.members.iter().find(|m| m.id() == id).cloned()
    }

    /// Pinned member if `pin` is set, otherwise the next member in rotation.
    pub fn route(&mut self, pin: Option<ActorId>) -> Option<Addr<A>> {
        match pin {
            Some(id) => self.get(id),
            None => self.next(),
        }
    }
}

/// A domain request plus an optional pinned destination.
#[derive(Debug)]
pub struct Routed<M> {
    pub pin: Option<ActorId>,
    pub message: M,
}

impl<M> Routed<M> {
    pub fn new(pin: Option<ActorId>, message: M) -> Self {
        Self { pin, message }
    }

    pub fn any(message: M) -> Self {
        Self { pin: None, message }
    }
}

/// Answers a request with an error without handling it.
pub trait Reject {
    fn reject(self, error: DomainError);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_runtime::{mock, Context};
    use async_trait::async_trait;

    struct Sink;

    #[async_trait]
    impl Actor for Sink {
        type Message = ();
        async fn handle(&mut self, _: (), _: &mut Context<Self>) {}
    }

    #[tokio::test]
    async fn test_round_robin_wraps() {
        let members: Vec<_> = (0..3).map(|_| mock::mailbox::<Sink>().0).collect();
        let ids: Vec<_> = members.iter().map(|m| m.id()).collect();
        let mut pool = Pool::new(members);

        let picked: Vec<_> = (0..7).map(|_| pool.next().unwrap().id()).collect();
        assert_eq!(
            picked,
            vec![ids[0], ids[1], ids[2], ids[0], ids[1], ids[2], ids[0]]
        );
    }

    #[tokio::test]
    async fn test_pinned_route_bypasses_cursor() {
        let members: Vec<_> = (0..3).map(|_| mock::mailbox::<Sink>().0).collect();
        let ids: Vec<_> = members.iter().map(|m| m.id()).collect();
        let mut pool = Pool::new(members);

        assert_eq!(pool.route(Some(ids[2])).unwrap().id(), ids[2]);
        assert_eq!(pool.route(Some(ids[2])).unwrap().id(), ids[2]);
        // The cursor did not move.
        assert_eq!(pool.route(None).unwrap().id(), ids[0]);

        let (stranger, _inbox) = mock::mailbox::<Sink>();
        assert!(pool.route(Some(stranger.id())).is_none());
    }

    #[test]
    fn test_empty_pool_routes_nowhere() {
        let mut pool = Pool::<Sink>::new(Vec::new());
        assert!(pool.next().is_none());
        assert!(pool.is_empty());
    }
}
