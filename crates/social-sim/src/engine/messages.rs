use crate::comment_actor::CommentMessage;
use crate::community_actor::CommunityMessage;
use crate::dm_actor::DirectMessageMessage;
use crate::error::{DomainError, DomainResult};
use crate::model::{TargetKind, VoteOutcome};
use crate::pool::{Reject, Routed};
use crate::post_actor::PostMessage;
use crate::user_actor::UserMessage;
use actor_runtime::Reply;

/// A vote on a post or comment; `target_type` picks the pool family.
#[derive(Debug)]
pub struct VoteRequest {
    pub target_id: String,
    pub user_id: String,
    pub is_upvote: bool,
    pub target_type: TargetKind,
    pub reply: Reply<DomainResult<VoteOutcome>>,
}

impl Reject for VoteRequest {
    fn reject(self, error: DomainError) {
        self.reply.respond(Err(error));
    }
}

impl VoteRequest {
    pub fn into_post_message(self) -> PostMessage {
        PostMessage::Vote {
            post_id: self.target_id,
            user_id: self.user_id,
            is_upvote: self.is_upvote,
            reply: self.reply,
        }
    }

    pub fn into_comment_message(self) -> CommentMessage {
        CommentMessage::Vote {
            comment_id: self.target_id,
            user_id: self.user_id,
            is_upvote: self.is_upvote,
            reply: self.reply,
        }
    }
}

/// Everything an engine accepts, one variant per pool family.
#[derive(Debug)]
pub enum EngineRequest {
    User(Routed<UserMessage>),
    Community(Routed<CommunityMessage>),
    Post(Routed<PostMessage>),
    Comment(Routed<CommentMessage>),
    DirectMessage(Routed<DirectMessageMessage>),
    Vote(Routed<VoteRequest>),
}

impl From<UserMessage> for EngineRequest {
    fn from(message: UserMessage) -> Self {
        EngineRequest::User(Routed::any(message))
    }
}

impl From<CommunityMessage> for EngineRequest {
    fn from(message: CommunityMessage) -> Self {
        EngineRequest::Community(Routed::any(message))
    }
}

impl From<PostMessage> for EngineRequest {
    fn from(message: PostMessage) -> Self {
        EngineRequest::Post(Routed::any(message))
    }
}

impl From<CommentMessage> for EngineRequest {
    fn from(message: CommentMessage) -> Self {
        EngineRequest::Comment(Routed::any(message))
    }
}

impl From<DirectMessageMessage> for EngineRequest {
    fn from(message: DirectMessageMessage) -> Self {
        EngineRequest::DirectMessage(Routed::any(message))
    }
}

impl From<VoteRequest> for EngineRequest {
    fn from(message: VoteRequest) -> Self {
        EngineRequest::Vote(Routed::any(message))
    }
}
