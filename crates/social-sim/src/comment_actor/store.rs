use crate::error::{DomainError, DomainResult};
use crate::model::{net_score, toggle_vote, Comment, CommentView, VoteOutcome};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub type SharedComments = Arc<RwLock<CommentStore>>;

/// Deepest allowed reply chain; top-level comments are at depth 1.
///
/// Views nest one level per reply and are cloned, formatted, serialized and
/// dropped recursively, so the depth has to stay bounded.
pub const MAX_REPLY_DEPTH: usize = 256;

/// Comment forest for every post.
///
/// Trees are stored as adjacency lists and walked with explicit stacks, so
/// reply depth never turns into call depth.
#[derive(Debug, Default)]
pub struct CommentStore {
    comments: HashMap<String, Comment>,
    /// Post id to top-level comment ids, in creation order.
    top_level: HashMap<String, Vec<String>>,
    /// Comment id to direct reply ids, in creation order.
    replies: HashMap<String, Vec<String>>,
    /// Posts whose comments were cascade-deleted.
    retired_posts: HashSet<String>,
}

struct Frame<'a> {
    view: CommentView,
    children: std::slice::Iter<'a, String>,
}

impl CommentStore {
    pub fn shared() -> SharedComments {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn get(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.get(comment_id)
    }

    /// Adds a comment; a `None` or empty parent makes it top-level.
    pub fn create(
        &mut self,
        post_id: &str,
        parent_id: Option<String>,
        content: &str,
        author_id: &str,
    ) -> DomainResult<String> {
        if content.is_empty() {
            return Err(DomainError::invalid("Comment content is required"));
        }
        if self.retired_posts.contains(post_id) {
            return Err(DomainError::not_found("Post not found"));
        }
        let parent_id = parent_id.filter(|p| !p.is_empty());
        if let Some(parent) = &parent_id {
            match self.comments.get(parent) {
                Some(p) if p.post_id == post_id => {}
                _ => return Err(DomainError::not_found("Parent comment not found")),
            }
            if self.depth_of(parent) >= MAX_REPLY_DEPTH {
                return Err(DomainError::invalid("Reply chain is too deep"));
            }
        }

        let comment = Comment::new(post_id, parent_id.clone(), content, author_id);
        let id = comment.id.clone();
        match parent_id {
            Some(parent) => self.replies.entry(parent).or_default().push(id.clone()),
            None => self
                .top_level
                .entry(post_id.to_string())
                .or_default()
                .push(id.clone()),
        }
        self.comments.insert(id.clone(), comment);
        Ok(id)
    }

    /// The post's comment forest with replies resolved.
    pub fn tree(&self, post_id: &str) -> Vec<CommentView> {
        let roots = self
            .top_level
            .get(post_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut forest = Vec::new();
        let mut top = roots.iter();
        let mut stack: Vec<Frame<'_>> = Vec::new();
        loop {
            let next = match stack.last_mut() {
                Some(frame) => frame.children.next(),
                None => top.next(),
            };
            match next {
                Some(id) => {
                    if let Some(comment) = self.comments.get(id) {
                        stack.push(Frame {
                            view: CommentView::from(comment),
                            children: self.children_of(id).iter(),
                        });
                    }
                }
                None => {
                    let Some(done) = stack.pop() else {
                        break;
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.view.replies.push(done.view),
                        None => forest.push(done.view),
                    }
                }
            }
        }
        forest
    }

    pub fn trees(&self, post_ids: &[String]) -> HashMap<String, Vec<CommentView>> {
        post_ids
            .iter()
            .map(|id| (id.clone(), self.tree(id)))
            .collect()
    }

    /// Returns the comment's author and the score change.
    pub fn vote(
        &mut self,
        comment_id: &str,
        user_id: &str,
        is_upvote: bool,
    ) -> DomainResult<(String, VoteOutcome)> {
        let comment = self
            .comments
            .get_mut(comment_id)
            .ok_or_else(|| DomainError::not_found("Comment not found"))?;
        let outcome = toggle_vote(&mut comment.votes, user_id, is_upvote);
        Ok((comment.author_id.clone(), outcome))
    }

    pub fn edit(&mut self, comment_id: &str, author_id: &str, content: &str) -> DomainResult<Comment> {
        let comment = self
            .comments
            .get_mut(comment_id)
            .ok_or_else(|| DomainError::not_found("Comment not found"))?;
        if comment.author_id != author_id {
            return Err(DomainError::unauthorized("Not authorized to edit this comment"));
        }
        if content.is_empty() {
            return Err(DomainError::invalid("Comment content is required"));
        }
        comment.content = content.to_string();
        Ok(comment.clone())
    }

    /// Deletes a comment and its whole reply subtree.
    pub fn delete(&mut self, comment_id: &str, author_id: &str) -> DomainResult<Vec<Comment>> {
        let comment = self
            .comments
            .get(comment_id)
            .ok_or_else(|| DomainError::not_found("Comment not found"))?;
        if comment.author_id != author_id {
            return Err(DomainError::unauthorized(
                "Not authorized to delete this comment",
            ));
        }
        let (post_id, parent_id) = (comment.post_id.clone(), comment.parent_id.clone());

        let siblings = match &parent_id {
            Some(parent) => self.replies.get_mut(parent),
            None => self.top_level.get_mut(&post_id),
        };
        if let Some(siblings) = siblings {
            siblings.retain(|id| id != comment_id);
        }
        Ok(self.remove_subtree(comment_id))
    }

    /// Removes every comment on `post_ids` and closes those posts to new comments.
    pub fn remove_posts(&mut self, post_ids: &[String]) -> Vec<Comment> {
        let mut removed = Vec::new();
        for post_id in post_ids {
            self.retired_posts.insert(post_id.clone());
            for root in self.top_level.remove(post_id).unwrap_or_default() {
                removed.extend(self.remove_subtree(&root));
            }
        }
        removed
    }

    fn children_of(&self, comment_id: &str) -> &[String] {
        self.replies
            .get(comment_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn depth_of(&self, comment_id: &str) -> usize {
        let mut depth = 0;
        let mut current = self.comments.get(comment_id);
        while let Some(comment) = current {
            depth += 1;
            current = comment
                .parent_id
                .as_deref()
                .and_then(|parent| self.comments.get(parent));
        }
        depth
    }

    /// Removes `root` and all its descendants. Does not unlink `root`.
    fn remove_subtree(&mut self, root: &str) -> Vec<Comment> {
        let mut removed = Vec::new();
        let mut stack = vec![root.to_string()];
        while let Some(id) = stack.pop() {
            if let Some(children) = self.replies.remove(&id) {
                stack.extend(children);
            }
            if let Some(comment) = self.comments.remove(&id) {
                removed.push(comment);
            }
        }
        removed
    }
}

/// Compensation for deleting `comments`: minus each comment's net score.
pub fn karma_compensation(comments: &[Comment]) -> Vec<(String, i64)> {
    comments
        .iter()
        .map(|c| (c.author_id.clone(), -net_score(&c.votes)))
        .collect()
}
