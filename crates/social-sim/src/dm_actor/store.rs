use crate::error::{DomainError, DomainResult};
use crate::model::DirectMessage;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub type SharedInbox = Arc<RwLock<InboxStore>>;

#[derive(Debug, Default)]
pub struct InboxStore {
    messages: HashMap<String, DirectMessage>,
    /// User id to message ids, in delivery order.
    inboxes: HashMap<String, Vec<String>>,
}

impl InboxStore {
    pub fn shared() -> SharedInbox {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Stores one record and lists it under both participants.
    pub fn send(
        &mut self,
        from_user_id: &str,
        to_user_id: &str,
        content: &str,
        parent_id: Option<String>,
    ) -> DomainResult<String> {
        if from_user_id.is_empty() || to_user_id.is_empty() {
            return Err(DomainError::invalid("Sender and recipient are required"));
        }
        if content.is_empty() {
            return Err(DomainError::invalid("Message content is required"));
        }
        let parent_id = parent_id.filter(|p| !p.is_empty());
        if let Some(parent) = &parent_id {
            if !self.messages.contains_key(parent) {
                return Err(DomainError::not_found("Parent message not found"));
            }
        }

        let message = DirectMessage::new(from_user_id, to_user_id, content, parent_id);
        let id = message.id.clone();
        self.inboxes
            .entry(from_user_id.to_string())
            .or_default()
            .push(id.clone());
        if to_user_id != from_user_id {
            self.inboxes
                .entry(to_user_id.to_string())
                .or_default()
                .push(id.clone());
        }
        self.messages.insert(id.clone(), message);
        Ok(id)
    }

    /// Sent and received messages, oldest first.
    pub fn inbox(&self, user_id: &str) -> Vec<DirectMessage> {
        self.inboxes
            .get(user_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.messages.get(id))
            .cloned()
            .collect()
    }
}
