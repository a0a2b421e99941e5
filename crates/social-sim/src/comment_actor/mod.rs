//! # Comment Actor
//!
//! Comment forests, comment votes and the leaf hop of the delete cascade.
//! Every karma effect (votes and deletions) is pushed to the user pool as a
//! delta once the handler returns.

pub mod messages;
pub mod store;

pub use messages::*;
pub use store::*;

use crate::model::{Created, Removed};
use crate::pool::Pool;
use crate::user_actor::{push_karma, UserActor};
use actor_runtime::{Actor, Context};
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

pub struct CommentActor {
    store: SharedComments,
    users: Pool<UserActor>,
}

impl CommentActor {
    pub fn new(store: SharedComments, users: Pool<UserActor>) -> Self {
        Self { store, users }
    }
}

#[async_trait]
impl Actor for CommentActor {
    type Message = CommentMessage;

    async fn handle(&mut self, msg: CommentMessage, ctx: &mut Context<Self>) {
        match msg {
            CommentMessage::Create {
                post_id,
                parent_id,
                content,
                author_id,
                reply,
            } => {
                let result = self
                    .store
                    .write()
                    .create(&post_id, parent_id, &content, &author_id);
                match &result {
                    Ok(id) => debug!(comment_id = %id, %post_id, "Comment created"),
                    Err(e) => debug!(%post_id, error = %e, "Create failed"),
                }
                reply.respond(result.map(|id| Created {
                    id,
                    served_by: ctx.id(),
                }));
            }
            CommentMessage::ListByPost { post_id, reply } => {
                let tree = self.store.read().tree(&post_id);
                reply.respond(Ok(tree));
            }
            CommentMessage::Vote {
                comment_id,
                user_id,
                is_upvote,
                reply,
            } => {
                let voted = self.store.write().vote(&comment_id, &user_id, is_upvote);
                let result = match voted {
                    Ok((author, outcome)) => {
                        push_karma(ctx, &mut self.users, [(author, outcome.score_delta)]);
                        Ok(outcome)
                    }
                    Err(e) => Err(e),
                };
                debug!(%comment_id, %user_id, is_upvote, ?result, "Vote");
                reply.respond(result);
            }
            CommentMessage::Edit {
                comment_id,
                author_id,
                content,
                reply,
            } => {
                let result = self.store.write().edit(&comment_id, &author_id, &content);
                debug!(%comment_id, ok = result.is_ok(), "Edit");
                reply.respond(result);
            }
            CommentMessage::Delete {
                comment_id,
                author_id,
                reply,
            } => {
                let deleted = self.store.write().delete(&comment_id, &author_id);
                let result = match deleted {
                    Ok(removed) => {
                        info!(%comment_id, removed = removed.len(), "Comment deleted");
                        push_karma(ctx, &mut self.users, karma_compensation(&removed));
                        Ok(Removed {
                            posts: 0,
                            comments: removed.len(),
                        })
                    }
                    Err(e) => {
                        debug!(%comment_id, error = %e, "Delete failed");
                        Err(e)
                    }
                };
                reply.respond(result);
            }
            CommentMessage::DeleteAllForPosts {
                post_ids,
                deadline,
                reply,
            } => {
                // Past the deadline the caller has already reported failure.
                if let Err(e) = deadline.check() {
                    warn!(posts = post_ids.len(), "Cascade arrived after its deadline");
                    reply.respond(Err(e));
                    return;
                }
                let removed = self.store.write().remove_posts(&post_ids);
                info!(posts = post_ids.len(), comments = removed.len(), "Comments deleted for posts");
                push_karma(ctx, &mut self.users, karma_compensation(&removed));
                let delivered = reply.respond(Ok(Removed {
                    posts: 0,
                    comments: removed.len(),
                }));
                if !delivered {
                    error!(
                        ?post_ids,
                        comments = removed.len(),
                        "Comments removed after the caller gave up"
                    );
                }
            }
            CommentMessage::TreesForPosts { post_ids, reply } => {
                let trees = self.store.read().trees(&post_ids);
                reply.respond(Ok(trees));
            }
        }
    }
}
