use crate::error::{DomainError, DomainResult};
use crate::model::{CommunitySummary, Created, Removed};
use crate::pool::Reject;
use actor_runtime::Reply;

#[derive(Debug)]
pub enum CommunityMessage {
    Create {
        name: String,
        description: String,
        creator_id: String,
        reply: Reply<DomainResult<Created>>,
    },
    Join {
        community: String,
        user_id: String,
        reply: Reply<DomainResult<()>>,
    },
    Leave {
        community: String,
        user_id: String,
        reply: Reply<DomainResult<()>>,
    },
    GetMembers {
        community: String,
        reply: Reply<DomainResult<Vec<String>>>,
    },
    /// Every community name, sorted.
    GetAll {
        reply: Reply<DomainResult<Vec<String>>>,
    },
    ListForMember {
        user_id: String,
        reply: Reply<DomainResult<Vec<CommunitySummary>>>,
    },
    /// Creator-only; cascades to the community's posts and comments.
    Delete {
        community: String,
        requester_id: String,
        reply: Reply<DomainResult<Removed>>,
    },
}

impl Reject for CommunityMessage {
    fn reject(self, error: DomainError) {
        match self {
            CommunityMessage::Create { reply, .. } => {
                reply.respond(Err(error));
            }
            CommunityMessage::Join { reply, .. } | CommunityMessage::Leave { reply, .. } => {
                reply.respond(Err(error));
            }
            CommunityMessage::GetMembers { reply, .. } | CommunityMessage::GetAll { reply } => {
                reply.respond(Err(error));
            }
            CommunityMessage::ListForMember { reply, .. } => {
                reply.respond(Err(error));
            }
            CommunityMessage::Delete { reply, .. } => {
                reply.respond(Err(error));
            }
        }
    }
}
