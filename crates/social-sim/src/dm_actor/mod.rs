//! # Direct Message Actor
//!
//! Private messages between users. Each message is stored once and indexed
//! in both the sender's and the recipient's inbox.

pub mod messages;
pub mod store;

pub use messages::*;
pub use store::*;

use crate::model::Created;
use actor_runtime::{Actor, Context};
use async_trait::async_trait;
use tracing::debug;

pub struct DirectMessageActor {
    store: SharedInbox,
}

impl DirectMessageActor {
    pub fn new(store: SharedInbox) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Actor for DirectMessageActor {
    type Message = DirectMessageMessage;

    async fn handle(&mut self, msg: DirectMessageMessage, ctx: &mut Context<Self>) {
        match msg {
            DirectMessageMessage::Send {
                from_user_id,
                to_user_id,
                content,
                parent_id,
                reply,
            } => {
                let result =
                    self.store
                        .write()
                        .send(&from_user_id, &to_user_id, &content, parent_id);
                debug!(from = %from_user_id, to = %to_user_id, ok = result.is_ok(), "Send");
                reply.respond(result.map(|id| Created {
                    id,
                    served_by: ctx.id(),
                }));
            }
            DirectMessageMessage::ListForUser { user_id, reply } => {
                let inbox = self.store.read().inbox(&user_id);
                reply.respond(Ok(inbox));
            }
        }
    }
}
