use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// A community (subreddit). The name is its unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Community {
    pub name: String,
    pub description: String,
    pub creator_id: String,
    pub members: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Community {
    /// The creator is always the first member.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        creator_id: impl Into<String>,
    ) -> Self {
        let creator_id = creator_id.into();
        Self {
            name: name.into(),
            description: description.into(),
            members: BTreeSet::from([creator_id.clone()]),
            creator_id,
            created_at: Utc::now(),
        }
    }
}
