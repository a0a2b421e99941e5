use super::vote::Votes;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    /// Fixed at creation.
    pub community_name: String,
    pub created_at: DateTime<Utc>,
    pub votes: Votes,
}

impl Post {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author_id: impl Into<String>,
        community_name: impl Into<String>,
    ) -> Self {
        Self {
            id: super::new_id("post"),
            title: title.into(),
            content: content.into(),
            author_id: author_id.into(),
            community_name: community_name.into(),
            created_at: Utc::now(),
            votes: Votes::new(),
        }
    }

    /// Case-insensitive substring match over title and content.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}
