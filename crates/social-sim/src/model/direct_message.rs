use chrono::{DateTime, Utc};
use serde::Serialize;

/// A private message, stored once and listed in both participants' inboxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectMessage {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub content: String,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DirectMessage {
    pub fn new(
        from_user_id: impl Into<String>,
        to_user_id: impl Into<String>,
        content: impl Into<String>,
        parent_id: Option<String>,
    ) -> Self {
        Self {
            id: super::new_id("dm"),
            from_user_id: from_user_id.into(),
            to_user_id: to_user_id.into(),
            content: content.into(),
            parent_id,
            created_at: Utc::now(),
        }
    }
}
