//! Plain data types for the social platform.
//!
//! Nothing in here knows about actors; the stores and actors own instances
//! of these types and hand out clones or views.

pub mod comment;
pub mod community;
pub mod direct_message;
pub mod post;
pub mod user;
pub mod view;
pub mod vote;

pub use comment::*;
pub use community::*;
pub use direct_message::*;
pub use post::*;
pub use user::*;
pub use view::*;
pub use vote::*;

use actor_runtime::ActorId;

/// Reply to every create operation.
///
/// `served_by` names the pool member that created the entity, so later
/// requests about it can be pinned to the same actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub id: String,
    pub served_by: ActorId,
}

/// How much a delete removed, including cascaded children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Removed {
    pub posts: usize,
    pub comments: usize,
}

pub(crate) fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4().simple())
}
