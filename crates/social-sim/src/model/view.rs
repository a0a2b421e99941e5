//! Read models returned by search, listing and feed operations.

use super::comment::Comment;
use super::post::Post;
use super::vote::net_score;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A comment with its resolved reply subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: String,
    pub post_id: String,
    pub parent_id: Option<String>,
    pub content: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub vote_count: i64,
    pub replies: Vec<CommentView>,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.clone(),
            post_id: comment.post_id.clone(),
            parent_id: comment.parent_id.clone(),
            content: comment.content.clone(),
            author_id: comment.author_id.clone(),
            created_at: comment.created_at,
            vote_count: net_score(&comment.votes),
            replies: Vec::new(),
        }
    }
}

impl CommentView {
    /// Number of comments in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.replies.iter());
        }
        count
    }
}

/// A post together with its comment forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub community_name: String,
    pub created_at: DateTime<Utc>,
    pub vote_count: i64,
    pub comments: Vec<CommentView>,
}

impl PostView {
    pub fn new(post: &Post, comments: Vec<CommentView>) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            author_id: post.author_id.clone(),
            community_name: post.community_name.clone(),
            created_at: post.created_at,
            vote_count: net_score(&post.votes),
            comments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunitySummary {
    pub name: String,
    pub description: String,
}

/// One community's section of a user's feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunityFeed {
    pub name: String,
    pub description: String,
    pub posts: Vec<PostView>,
}
