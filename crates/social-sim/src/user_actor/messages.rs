use crate::error::{DomainError, DomainResult};
use crate::model::{CommunityFeed, Created};
use crate::pool::Reject;
use actor_runtime::Reply;
use tracing::warn;

#[derive(Debug)]
pub enum UserMessage {
    Register {
        username: String,
        password: String,
        reply: Reply<DomainResult<Created>>,
    },
    /// Replies with a session token.
    Login {
        username: String,
        password: String,
        reply: Reply<DomainResult<String>>,
    },
    /// Replies with the token's username.
    ValidateToken {
        token: String,
        reply: Reply<DomainResult<String>>,
    },
    /// Fire-and-forget; unknown users are ignored.
    UpdateKarma { user_id: String, delta: i64 },
    GetKarma {
        user_id: String,
        reply: Reply<DomainResult<i64>>,
    },
    GetFeed {
        user_id: String,
        reply: Reply<DomainResult<Vec<CommunityFeed>>>,
    },
}

impl Reject for UserMessage {
    fn reject(self, error: DomainError) {
        match self {
            UserMessage::Register { reply, .. } => {
                reply.respond(Err(error));
            }
            UserMessage::Login { reply, .. } | UserMessage::ValidateToken { reply, .. } => {
                reply.respond(Err(error));
            }
            UserMessage::UpdateKarma { user_id, delta } => {
                warn!(%user_id, delta, %error, "Karma update lost");
            }
            UserMessage::GetKarma { reply, .. } => {
                reply.respond(Err(error));
            }
            UserMessage::GetFeed { reply, .. } => {
                reply.respond(Err(error));
            }
        }
    }
}
