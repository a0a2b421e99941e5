use crate::error::{DomainError, DomainResult};
use crate::model::{Community, CommunitySummary};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub type SharedCommunities = Arc<RwLock<CommunityStore>>;

#[derive(Debug, Default)]
pub struct CommunityStore {
    communities: HashMap<String, Community>,
    /// Names of deleted communities; names are never reused.
    retired: HashSet<String>,
}

impl CommunityStore {
    pub fn shared() -> SharedCommunities {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn len(&self) -> usize {
        self.communities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Community> {
        self.communities.get(name)
    }

    pub fn create(&mut self, name: &str, description: &str, creator_id: &str) -> DomainResult<()> {
        if name.is_empty() || creator_id.is_empty() {
            return Err(DomainError::invalid("Community name and creator are required"));
        }
        if self.communities.contains_key(name) || self.retired.contains(name) {
            return Err(DomainError::conflict("Community already exists"));
        }
        self.communities.insert(
            name.to_string(),
            Community::new(name, description, creator_id),
        );
        Ok(())
    }

    pub fn join(&mut self, name: &str, user_id: &str) -> DomainResult<()> {
        let community = self.find_mut(name)?;
        if !community.members.insert(user_id.to_string()) {
            return Err(DomainError::conflict("User is already a member"));
        }
        Ok(())
    }

    /// Creators stay members for as long as the community exists.
    pub fn leave(&mut self, name: &str, user_id: &str) -> DomainResult<()> {
        let community = self.find_mut(name)?;
        if community.creator_id == user_id {
            return Err(DomainError::unauthorized(
                "Creator cannot leave their own community",
            ));
        }
        if !community.members.remove(user_id) {
            return Err(DomainError::not_found(
                "User is not a member of this community",
            ));
        }
        Ok(())
    }

    /// Members in sorted order.
    pub fn members(&self, name: &str) -> DomainResult<Vec<String>> {
        self.communities
            .get(name)
            .map(|c| c.members.iter().cloned().collect())
            .ok_or_else(|| DomainError::not_found("Community not found"))
    }

    /// All community names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.communities.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn for_member(&self, user_id: &str) -> Vec<CommunitySummary> {
        let mut joined: Vec<CommunitySummary> = self
            .communities
            .values()
            .filter(|c| c.members.contains(user_id))
            .map(|c| CommunitySummary {
                name: c.name.clone(),
                description: c.description.clone(),
            })
            .collect();
        joined.sort_by(|a, b| a.name.cmp(&b.name));
        joined
    }

    pub fn authorize_delete(&self, name: &str, requester_id: &str) -> DomainResult<()> {
        let community = self
            .communities
            .get(name)
            .ok_or_else(|| DomainError::not_found("Community not found"))?;
        if community.creator_id != requester_id {
            return Err(DomainError::unauthorized(
                "Not authorized to delete this community",
            ));
        }
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<Community> {
        let removed = self.communities.remove(name);
        if removed.is_some() {
            self.retired.insert(name.to_string());
        }
        removed
    }

    fn find_mut(&mut self, name: &str) -> DomainResult<&mut Community> {
        self.communities
            .get_mut(name)
            .ok_or_else(|| DomainError::not_found("Community not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_rust() -> CommunityStore {
        let mut store = CommunityStore::default();
        store.create("rust", "Rustaceans", "alice").unwrap();
        store
    }

    #[test]
    fn test_creator_is_first_member() {
        let store = store_with_rust();
        assert_eq!(store.members("rust"), Ok(vec!["alice".to_string()]));
    }

    #[test]
    fn test_join_leave_restores_members() {
        let mut store = store_with_rust();
        let before = store.members("rust").unwrap();

        store.join("rust", "bob").unwrap();
        assert_eq!(
            store.join("rust", "bob"),
            Err(DomainError::conflict("User is already a member"))
        );
        store.leave("rust", "bob").unwrap();

        assert_eq!(store.members("rust").unwrap(), before);
        assert!(store.leave("rust", "bob").is_err());
    }

    #[test]
    fn test_creator_cannot_leave() {
        let mut store = store_with_rust();
        assert!(matches!(
            store.leave("rust", "alice"),
            Err(DomainError::Unauthorized(_))
        ));
        assert_eq!(store.members("rust").unwrap(), vec!["alice".to_string()]);
    }

    #[test]
    fn test_names_are_not_reused_after_delete() {
        let mut store = store_with_rust();
        assert!(store.authorize_delete("rust", "bob").is_err());
        store.authorize_delete("rust", "alice").unwrap();
        assert!(store.remove("rust").is_some());

        assert_eq!(
            store.create("rust", "again", "bob"),
            Err(DomainError::conflict("Community already exists"))
        );
        assert!(store.names().is_empty());
    }

    #[test]
    fn test_for_member_lists_joined_only() {
        let mut store = store_with_rust();
        store.create("go", "Gophers", "carol").unwrap();
        store.create("zig", "Ziguanas", "dave").unwrap();
        store.join("zig", "alice").unwrap();

        let names: Vec<String> = store
            .for_member("alice")
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["rust".to_string(), "zig".to_string()]);
        assert_eq!(store.names(), vec!["go", "rust", "zig"]);
    }
}
