use crate::error::{DomainError, DomainResult};
use crate::model::{net_score, toggle_vote, Post, VoteOutcome};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub type SharedPosts = Arc<RwLock<PostStore>>;

#[derive(Debug, Default)]
pub struct PostStore {
    posts: HashMap<String, Post>,
    /// Community name to post ids, in creation order.
    by_community: HashMap<String, Vec<String>>,
    /// Communities whose delete cascade is in flight.
    closing: HashSet<String>,
    /// Communities whose posts were removed by a cascade.
    deleted: HashSet<String>,
}

impl PostStore {
    pub fn shared() -> SharedPosts {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn create(&mut self, post: Post) -> DomainResult<String> {
        if post.title.is_empty() || post.author_id.is_empty() || post.community_name.is_empty() {
            return Err(DomainError::invalid(
                "Post title, author and community are required",
            ));
        }
        if self.is_closed(&post.community_name) {
            return Err(DomainError::not_found("Community not found"));
        }
        if self.posts.contains_key(&post.id) {
            return Err(DomainError::conflict("Post already exists"));
        }
        let id = post.id.clone();
        self.by_community
            .entry(post.community_name.clone())
            .or_default()
            .push(id.clone());
        self.posts.insert(id.clone(), post);
        Ok(id)
    }

    fn is_closed(&self, community: &str) -> bool {
        self.closing.contains(community) || self.deleted.contains(community)
    }

    pub fn get(&self, post_id: &str) -> DomainResult<Post> {
        self.posts
            .get(post_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Post not found"))
    }

    /// Posts of one community in creation order.
    pub fn posts_in(&self, community: &str) -> Vec<Post> {
        self.by_community
            .get(community)
            .into_iter()
            .flatten()
            .filter_map(|id| self.posts.get(id))
            .cloned()
            .collect()
    }

    /// Case-insensitive match over title and content, oldest first.
    pub fn search(&self, query: &str) -> Vec<Post> {
        let needle = query.to_lowercase();
        let mut matches: Vec<Post> = self
            .posts
            .values()
            .filter(|post| post.matches(&needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        matches
    }

    /// Replaces only the fields given as non-empty strings.
    pub fn edit(
        &mut self,
        post_id: &str,
        author_id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> DomainResult<Post> {
        let post = self
            .posts
            .get_mut(post_id)
            .ok_or_else(|| DomainError::not_found("Post not found"))?;
        if post.author_id != author_id {
            return Err(DomainError::unauthorized("Not authorized to edit this post"));
        }
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            post.title = title.to_string();
        }
        if let Some(content) = content.filter(|c| !c.is_empty()) {
            post.content = content.to_string();
        }
        Ok(post.clone())
    }

    pub fn authorize_delete(&self, post_id: &str, author_id: &str) -> DomainResult<()> {
        let post = self
            .posts
            .get(post_id)
            .ok_or_else(|| DomainError::not_found("Post not found"))?;
        if post.author_id != author_id {
            return Err(DomainError::unauthorized("Not authorized to delete this post"));
        }
        Ok(())
    }

    /// Removes a post and unlinks it from its community.
    pub fn remove(&mut self, post_id: &str) -> Option<Post> {
        let post = self.posts.remove(post_id)?;
        if let Some(ids) = self.by_community.get_mut(&post.community_name) {
            ids.retain(|id| id != post_id);
            if ids.is_empty() {
                self.by_community.remove(&post.community_name);
            }
        }
        Some(post)
    }

    /// Returns the author and the score change.
    pub fn vote(
        &mut self,
        post_id: &str,
        user_id: &str,
        is_upvote: bool,
    ) -> DomainResult<(String, VoteOutcome)> {
        let post = self
            .posts
            .get_mut(post_id)
            .ok_or_else(|| DomainError::not_found("Post not found"))?;
        let outcome = toggle_vote(&mut post.votes, user_id, is_upvote);
        Ok((post.author_id.clone(), outcome))
    }

    /// Closes a community to new posts and returns the ids currently in it.
    pub fn retire_community(&mut self, community: &str) -> Vec<String> {
        self.closing.insert(community.to_string());
        self.by_community.get(community).cloned().unwrap_or_default()
    }

    /// Lifts a retirement; a no-op once the community's posts are gone.
    pub fn reopen_community(&mut self, community: &str) -> bool {
        self.closing.remove(community)
    }

    /// Removes every post of a retired community. The name stays closed.
    pub fn remove_community(&mut self, community: &str) -> Vec<Post> {
        self.closing.remove(community);
        self.deleted.insert(community.to_string());
        let ids = self.by_community.remove(community).unwrap_or_default();
        ids.iter().filter_map(|id| self.posts.remove(id)).collect()
    }
}

/// Compensation for deleting `posts`: minus each post's net score.
pub fn karma_compensation(posts: &[Post]) -> Vec<(String, i64)> {
    posts
        .iter()
        .map(|post| (post.author_id.clone(), -net_score(&post.votes)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(community: &str, title: &str, author: &str) -> Post {
        Post::new(title, format!("{title} body"), author, community)
    }

    #[test]
    fn test_create_and_list_in_order() {
        let mut store = PostStore::default();
        let first = store.create(post("rust", "Ownership", "alice")).unwrap();
        let second = store.create(post("rust", "Borrowing", "bob")).unwrap();
        store.create(post("go", "Goroutines", "carol")).unwrap();

        let ids: Vec<String> = store.posts_in("rust").into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert!(store.posts_in("zig").is_empty());
    }

    #[test]
    fn test_duplicate_id_conflicts() {
        let mut store = PostStore::default();
        let original = post("rust", "Ownership", "alice");
        store.create(original.clone()).unwrap();
        assert_eq!(
            store.create(original),
            Err(DomainError::conflict("Post already exists"))
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut store = PostStore::default();
        store.create(post("rust", "Async Rust", "alice")).unwrap();
        store.create(post("go", "Channels", "bob")).unwrap();

        let titles: Vec<String> = store.search("ASYNC").into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["Async Rust".to_string()]);
        assert_eq!(store.search("body").len(), 2);
    }

    #[test]
    fn test_edit_checks_author_and_skips_empty_fields() {
        let mut store = PostStore::default();
        let id = store.create(post("rust", "Ownership", "alice")).unwrap();

        assert!(matches!(
            store.edit(&id, "bob", Some("Hijacked"), None),
            Err(DomainError::Unauthorized(_))
        ));
        let edited = store.edit(&id, "alice", Some(""), Some("New body")).unwrap();
        assert_eq!(edited.title, "Ownership");
        assert_eq!(edited.content, "New body");
    }

    #[test]
    fn test_remove_unlinks_from_community() {
        let mut store = PostStore::default();
        let id = store.create(post("rust", "Ownership", "alice")).unwrap();
        assert!(store.remove(&id).is_some());
        assert!(store.posts_in("rust").is_empty());
        assert_eq!(store.get(&id), Err(DomainError::not_found("Post not found")));
        assert!(store.remove(&id).is_none());
    }

    #[test]
    fn test_retired_community_rejects_posts_until_reopened() {
        let mut store = PostStore::default();
        let id = store.create(post("rust", "Ownership", "alice")).unwrap();

        assert_eq!(store.retire_community("rust"), vec![id]);
        assert!(store.create(post("rust", "Late", "bob")).is_err());

        assert!(store.reopen_community("rust"));
        assert!(store.create(post("rust", "Late", "bob")).is_ok());
    }

    #[test]
    fn test_remove_community_stays_retired() {
        let mut store = PostStore::default();
        store.create(post("rust", "Ownership", "alice")).unwrap();
        store.create(post("rust", "Borrowing", "alice")).unwrap();

        store.retire_community("rust");
        let removed = store.remove_community("rust");
        assert_eq!(removed.len(), 2);
        assert!(store.is_empty());

        assert!(!store.reopen_community("rust"));
        assert!(store.create(post("rust", "Again", "bob")).is_err());
    }

    #[test]
    fn test_vote_compensation_matches_net_score() {
        let mut store = PostStore::default();
        let id = store.create(post("rust", "Ownership", "alice")).unwrap();
        store.vote(&id, "bob", true).unwrap();
        store.vote(&id, "carol", true).unwrap();
        store.vote(&id, "dave", false).unwrap();

        let removed = store.remove(&id).into_iter().collect::<Vec<_>>();
        assert_eq!(
            karma_compensation(&removed),
            vec![("alice".to_string(), -1)]
        );
    }
}
