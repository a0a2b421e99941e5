//! # Community Actor
//!
//! Communities, their membership and the top of the delete cascade.
//!
//! ## Delete
//!
//! Deleting a community is a two-hop cascade. The actor first asks one post
//! actor to remove every post in the community (which in turn removes their
//! comments), and only removes the community itself once that hop reports
//! success. If the hop fails or times out, the same post actor is told to
//! reopen the community so posting can resume.

pub mod messages;
pub mod store;

pub use messages::*;
pub use store::*;

use crate::cascade::{ask, Deadline};
use crate::error::{DomainError, DomainResult, ACTOR_UNAVAILABLE};
use crate::model::{Created, Removed};
use crate::pool::Pool;
use crate::post_actor::{PostActor, PostMessage};
use actor_runtime::{Actor, Context};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct CommunityActor {
    store: SharedCommunities,
    posts: Pool<PostActor>,
    timeout: Duration,
}

impl CommunityActor {
    pub fn new(store: SharedCommunities, posts: Pool<PostActor>, timeout: Duration) -> Self {
        Self {
            store,
            posts,
            timeout,
        }
    }

    async fn delete(
        &mut self,
        community: String,
        requester_id: String,
        ctx: &mut Context<Self>,
    ) -> DomainResult<Removed> {
        let authorized = self.store.read().authorize_delete(&community, &requester_id);
        authorized?;

        let Some(post_actor) = self.posts.next() else {
            return Err(DomainError::Unavailable(ACTOR_UNAVAILABLE.to_string()));
        };
        let deadline = Deadline::after(self.timeout);
        let name = community.clone();
        let cascade = ask(
            ctx,
            Some(post_actor.clone()),
            move |reply| PostMessage::DeleteAllForCommunity {
                community: name,
                deadline,
                reply,
            },
            deadline.remaining(),
        )
        .await;

        let removed = match cascade {
            Ok(removed) => removed,
            Err(e) => {
                // The post actor may still commit after we gave up; it ignores
                // the reopen in that case because the community is gone.
                ctx.send(
                    &post_actor,
                    PostMessage::ReopenCommunity {
                        community: community.clone(),
                    },
                );
                return Err(DomainError::cascade("posts", e));
            }
        };

        let gone = self.store.write().remove(&community);
        if gone.is_none() {
            error!(%community, ?removed, "Posts removed but community already gone");
            return Err(DomainError::not_found("Community not found"));
        }
        Ok(removed)
    }
}

#[async_trait]
impl Actor for CommunityActor {
    type Message = CommunityMessage;

    async fn handle(&mut self, msg: CommunityMessage, ctx: &mut Context<Self>) {
        match msg {
            CommunityMessage::Create {
                name,
                description,
                creator_id,
                reply,
            } => {
                let result = self.store.write().create(&name, &description, &creator_id);
                match &result {
                    Ok(()) => info!(community = %name, %creator_id, "Community created"),
                    Err(e) => debug!(community = %name, error = %e, "Create failed"),
                }
                reply.respond(result.map(|()| Created {
                    id: name,
                    served_by: ctx.id(),
                }));
            }
            CommunityMessage::Join {
                community,
                user_id,
                reply,
            } => {
                let result = self.store.write().join(&community, &user_id);
                debug!(%community, %user_id, ok = result.is_ok(), "Join");
                reply.respond(result);
            }
            CommunityMessage::Leave {
                community,
                user_id,
                reply,
            } => {
                let result = self.store.write().leave(&community, &user_id);
                debug!(%community, %user_id, ok = result.is_ok(), "Leave");
                reply.respond(result);
            }
            CommunityMessage::GetMembers { community, reply } => {
                let result = self.store.read().members(&community);
                reply.respond(result);
            }
            CommunityMessage::GetAll { reply } => {
                let names = self.store.read().names();
                reply.respond(Ok(names));
            }
            CommunityMessage::ListForMember { user_id, reply } => {
                let joined = self.store.read().for_member(&user_id);
                reply.respond(Ok(joined));
            }
            CommunityMessage::Delete {
                community,
                requester_id,
                reply,
            } => {
                let result = self.delete(community.clone(), requester_id, ctx).await;
                match &result {
                    Ok(removed) => info!(
                        %community,
                        posts = removed.posts,
                        comments = removed.comments,
                        "Community deleted"
                    ),
                    Err(e) => warn!(%community, error = %e, "Community delete failed"),
                }
                reply.respond(result);
            }
        }
    }
}
