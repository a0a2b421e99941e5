use super::vote::Votes;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A node in a post's comment forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: String,
    /// Fixed at creation.
    pub post_id: String,
    /// `None` for top-level comments.
    pub parent_id: Option<String>,
    pub content: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub votes: Votes,
}

impl Comment {
    pub fn new(
        post_id: impl Into<String>,
        parent_id: Option<String>,
        content: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Self {
        Self {
            id: super::new_id("comment"),
            post_id: post_id.into(),
            parent_id,
            content: content.into(),
            author_id: author_id.into(),
            created_at: Utc::now(),
            votes: Votes::new(),
        }
    }
}
