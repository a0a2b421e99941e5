use crate::cascade::Deadline;
use crate::error::{DomainError, DomainResult};
use crate::model::{Comment, CommentView, Created, Removed, VoteOutcome};
use crate::pool::Reject;
use actor_runtime::Reply;
use std::collections::HashMap;

#[derive(Debug)]
pub enum CommentMessage {
    Create {
        post_id: String,
        /// `None` or empty for a top-level comment.
        parent_id: Option<String>,
        content: String,
        author_id: String,
        reply: Reply<DomainResult<Created>>,
    },
    /// The post's comment forest.
    ListByPost {
        post_id: String,
        reply: Reply<DomainResult<Vec<CommentView>>>,
    },
    Vote {
        comment_id: String,
        user_id: String,
        is_upvote: bool,
        reply: Reply<DomainResult<VoteOutcome>>,
    },
    Edit {
        comment_id: String,
        author_id: String,
        content: String,
        reply: Reply<DomainResult<Comment>>,
    },
    /// Removes the comment and its reply subtree.
    Delete {
        comment_id: String,
        author_id: String,
        reply: Reply<DomainResult<Removed>>,
    },
    /// Cascade step of a post or community delete. All posts are handled in
    /// one critical section.
    DeleteAllForPosts {
        post_ids: Vec<String>,
        deadline: Deadline,
        reply: Reply<DomainResult<Removed>>,
    },
    TreesForPosts {
        post_ids: Vec<String>,
        reply: Reply<DomainResult<HashMap<String, Vec<CommentView>>>>,
    },
}

impl Reject for CommentMessage {
    fn reject(self, error: DomainError) {
        match self {
            CommentMessage::Create { reply, .. } => {
                reply.respond(Err(error));
            }
            CommentMessage::ListByPost { reply, .. } => {
                reply.respond(Err(error));
            }
            CommentMessage::Vote { reply, .. } => {
                reply.respond(Err(error));
            }
            CommentMessage::Edit { reply, .. } => {
                reply.respond(Err(error));
            }
            CommentMessage::Delete { reply, .. } | CommentMessage::DeleteAllForPosts { reply, .. } => {
                reply.respond(Err(error));
            }
            CommentMessage::TreesForPosts { reply, .. } => {
                reply.respond(Err(error));
            }
        }
    }
}
