//! # Post Actor
//!
//! Posts, post votes, search, and the middle hop of the delete cascade.
//!
//! Comment trees live with the comment actors, so search and feed results are
//! assembled here with one `TreesForPosts` request per call.

pub mod messages;
pub mod store;

pub use messages::*;
pub use store::*;

use crate::cascade::{ask, Deadline};
use crate::comment_actor::{CommentActor, CommentMessage};
use crate::error::{DomainError, DomainResult};
use crate::model::{Created, Post, PostView, Removed};
use crate::pool::Pool;
use crate::user_actor::{push_karma, UserActor};
use actor_runtime::{Actor, Context};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct PostActor {
    store: SharedPosts,
    comments: Pool<CommentActor>,
    users: Pool<UserActor>,
    timeout: Duration,
}

impl PostActor {
    pub fn new(
        store: SharedPosts,
        comments: Pool<CommentActor>,
        users: Pool<UserActor>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            comments,
            users,
            timeout,
        }
    }

    async fn with_comments(
        &mut self,
        posts: Vec<Post>,
        ctx: &mut Context<Self>,
    ) -> DomainResult<Vec<PostView>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        let post_ids = posts.iter().map(|p| p.id.clone()).collect();
        let mut trees = ask(
            ctx,
            self.comments.next(),
            move |reply| CommentMessage::TreesForPosts { post_ids, reply },
            self.timeout,
        )
        .await?;
        Ok(posts
            .iter()
            .map(|post| PostView::new(post, trees.remove(&post.id).unwrap_or_default()))
            .collect())
    }

    async fn delete(
        &mut self,
        post_id: String,
        author_id: String,
        ctx: &mut Context<Self>,
    ) -> DomainResult<Removed> {
        let authorized = self.store.read().authorize_delete(&post_id, &author_id);
        authorized?;

        let deadline = Deadline::after(self.timeout);
        let post_ids = vec![post_id.clone()];
        let comments = ask(
            ctx,
            self.comments.next(),
            move |reply| CommentMessage::DeleteAllForPosts {
                post_ids,
                deadline,
                reply,
            },
            deadline.remaining(),
        )
        .await
        .map_err(|e| DomainError::cascade("comments", e))?;

        let removed = self.store.write().remove(&post_id);
        let Some(post) = removed else {
            warn!(%post_id, "Comments removed but post already gone");
            return Err(DomainError::not_found("Post not found"));
        };
        push_karma(ctx, &mut self.users, karma_compensation(&[post]));
        Ok(Removed {
            posts: 1,
            comments: comments.comments,
        })
    }

    async fn delete_community(
        &mut self,
        community: String,
        deadline: Deadline,
        ctx: &mut Context<Self>,
    ) -> DomainResult<Removed> {
        deadline.check()?;
        let post_ids = self.store.write().retire_community(&community);

        if !post_ids.is_empty() {
            let ids = post_ids.clone();
            let cascade = ask(
                ctx,
                self.comments.next(),
                move |reply| CommentMessage::DeleteAllForPosts {
                    post_ids: ids,
                    deadline,
                    reply,
                },
                deadline.remaining(),
            )
            .await;
            let comments = match cascade {
                Ok(removed) => removed.comments,
                Err(e) => {
                    self.store.write().reopen_community(&community);
                    return Err(DomainError::cascade("comments", e));
                }
            };
            let posts = self.store.write().remove_community(&community);
            if posts.len() != post_ids.len() {
                debug!(
                    %community,
                    expected = post_ids.len(),
                    removed = posts.len(),
                    "Posts removed concurrently"
                );
            }
            push_karma(ctx, &mut self.users, karma_compensation(&posts));
            return Ok(Removed {
                posts: posts.len(),
                comments,
            });
        }

        self.store.write().remove_community(&community);
        Ok(Removed::default())
    }
}

#[async_trait]
impl Actor for PostActor {
    type Message = PostMessage;

    async fn handle(&mut self, msg: PostMessage, ctx: &mut Context<Self>) {
        match msg {
            PostMessage::Create {
                community_name,
                title,
                content,
                author_id,
                reply,
            } => {
                let post = Post::new(title, content, author_id, community_name);
                let (community, author) = (post.community_name.clone(), post.author_id.clone());
                let result = self.store.write().create(post);
                match &result {
                    Ok(id) => info!(post_id = %id, %community, %author, "Post created"),
                    Err(e) => debug!(%community, error = %e, "Create failed"),
                }
                reply.respond(result.map(|id| Created {
                    id,
                    served_by: ctx.id(),
                }));
            }
            PostMessage::Get { post_id, reply } => {
                let result = self.store.read().get(&post_id);
                reply.respond(result);
            }
            PostMessage::ListByCommunity { community, reply } => {
                let posts = self.store.read().posts_in(&community);
                reply.respond(Ok(posts));
            }
            PostMessage::Search { query, reply } => {
                let matches = self.store.read().search(&query);
                debug!(%query, matches = matches.len(), "Search");
                let result = self.with_comments(matches, ctx).await;
                reply.respond(result);
            }
            PostMessage::Edit {
                post_id,
                author_id,
                title,
                content,
                reply,
            } => {
                let result = self.store.write().edit(
                    &post_id,
                    &author_id,
                    title.as_deref(),
                    content.as_deref(),
                );
                debug!(%post_id, ok = result.is_ok(), "Edit");
                reply.respond(result);
            }
            PostMessage::Delete {
                post_id,
                author_id,
                reply,
            } => {
                let result = self.delete(post_id.clone(), author_id, ctx).await;
                match &result {
                    Ok(removed) => {
                        info!(%post_id, comments = removed.comments, "Post deleted")
                    }
                    Err(e) => warn!(%post_id, error = %e, "Post delete failed"),
                }
                reply.respond(result);
            }
            PostMessage::Vote {
                post_id,
                user_id,
                is_upvote,
                reply,
            } => {
                let voted = self.store.write().vote(&post_id, &user_id, is_upvote);
                let result = match voted {
                    Ok((author, outcome)) => {
                        push_karma(ctx, &mut self.users, [(author, outcome.score_delta)]);
                        Ok(outcome)
                    }
                    Err(e) => Err(e),
                };
                debug!(%post_id, %user_id, is_upvote, ?result, "Vote");
                reply.respond(result);
            }
            PostMessage::DeleteAllForCommunity {
                community,
                deadline,
                reply,
            } => {
                let result = self.delete_community(community.clone(), deadline, ctx).await;
                match &result {
                    Ok(removed) => {
                        info!(%community, posts = removed.posts, "Community posts deleted")
                    }
                    Err(e) => warn!(%community, error = %e, "Community posts delete failed"),
                }
                let committed = result.is_ok();
                if !reply.respond(result) && committed {
                    error!(%community, "Community posts removed after the caller gave up");
                }
            }
            PostMessage::ReopenCommunity { community } => {
                let reopened = self.store.write().reopen_community(&community);
                debug!(%community, reopened, "Reopen");
            }
            PostMessage::PostsWithComments { communities, reply } => {
                let posts: Vec<Post> = {
                    let store = self.store.read();
                    communities.iter().flat_map(|name| store.posts_in(name)).collect()
                };
                let result = self.with_comments(posts, ctx).await.map(|views| {
                    let mut grouped: BTreeMap<String, Vec<PostView>> = communities
                        .into_iter()
                        .map(|name| (name, Vec::new()))
                        .collect();
                    for view in views {
                        grouped
                            .entry(view.community_name.clone())
                            .or_default()
                            .push(view);
                    }
                    grouped
                });
                reply.respond(result);
            }
        }
    }
}
