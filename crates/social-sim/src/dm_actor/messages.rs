use crate::error::{DomainError, DomainResult};
use crate::model::{Created, DirectMessage};
use crate::pool::Reject;
use actor_runtime::Reply;

#[derive(Debug)]
pub enum DirectMessageMessage {
    Send {
        from_user_id: String,
        to_user_id: String,
        content: String,
        parent_id: Option<String>,
        reply: Reply<DomainResult<Created>>,
    },
    ListForUser {
        user_id: String,
        reply: Reply<DomainResult<Vec<DirectMessage>>>,
    },
}

impl Reject for DirectMessageMessage {
    fn reject(self, error: DomainError) {
        match self {
            DirectMessageMessage::Send { reply, .. } => {
                reply.respond(Err(error));
            }
            DirectMessageMessage::ListForUser { reply, .. } => {
                reply.respond(Err(error));
            }
        }
    }
}
