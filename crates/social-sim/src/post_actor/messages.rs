use crate::cascade::Deadline;
use crate::error::{DomainError, DomainResult};
use crate::model::{Created, Post, PostView, Removed, VoteOutcome};
use crate::pool::Reject;
use actor_runtime::Reply;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug)]
pub enum PostMessage {
    Create {
        community_name: String,
        title: String,
        content: String,
        author_id: String,
        reply: Reply<DomainResult<Created>>,
    },
    Get {
        post_id: String,
        reply: Reply<DomainResult<Post>>,
    },
    ListByCommunity {
        community: String,
        reply: Reply<DomainResult<Vec<Post>>>,
    },
    /// Matching posts with their comment trees.
    Search {
        query: String,
        reply: Reply<DomainResult<Vec<PostView>>>,
    },
    /// Empty or absent fields are left unchanged.
    Edit {
        post_id: String,
        author_id: String,
        title: Option<String>,
        content: Option<String>,
        reply: Reply<DomainResult<Post>>,
    },
    Delete {
        post_id: String,
        author_id: String,
        reply: Reply<DomainResult<Removed>>,
    },
    Vote {
        post_id: String,
        user_id: String,
        is_upvote: bool,
        reply: Reply<DomainResult<VoteOutcome>>,
    },
    /// Cascade step of a community delete.
    DeleteAllForCommunity {
        community: String,
        deadline: Deadline,
        reply: Reply<DomainResult<Removed>>,
    },
    /// Undoes the retirement left by a failed `DeleteAllForCommunity`.
    ReopenCommunity { community: String },
    /// Feed support: posts grouped by community, with comment trees.
    PostsWithComments {
        communities: Vec<String>,
        reply: Reply<DomainResult<BTreeMap<String, Vec<PostView>>>>,
    },
}

impl Reject for PostMessage {
    fn reject(self, error: DomainError) {
        match self {
            PostMessage::Create { reply, .. } => {
                reply.respond(Err(error));
            }
            PostMessage::Get { reply, .. } | PostMessage::Edit { reply, .. } => {
                reply.respond(Err(error));
            }
            PostMessage::ListByCommunity { reply, .. } => {
                reply.respond(Err(error));
            }
            PostMessage::Search { reply, .. } => {
                reply.respond(Err(error));
            }
            PostMessage::Delete { reply, .. } | PostMessage::DeleteAllForCommunity { reply, .. } => {
                reply.respond(Err(error));
            }
            PostMessage::Vote { reply, .. } => {
                reply.respond(Err(error));
            }
            PostMessage::ReopenCommunity { community } => {
                warn!(%community, %error, "Reopen lost");
            }
            PostMessage::PostsWithComments { reply, .. } => {
                reply.respond(Err(error));
            }
        }
    }
}
