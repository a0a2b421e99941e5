//! # Engine Client
//!
//! A high-level API over an engine address: one async method per request,
//! each building the message, routing it through the engine and flattening
//! transport and domain failures into a [`DomainResult`].
//!
//! ```rust,ignore
//! let client = backend.client(0);
//! let created = client.create_community("rust", "Rustaceans", "alice").await?;
//!
//! // Later requests about the same community go to the member that created it.
//! client.pinned(created.served_by).join_community("rust", "bob").await?;
//! ```
use crate::comment_actor::CommentMessage;
use crate::community_actor::CommunityMessage;
use crate::dm_actor::DirectMessageMessage;
use crate::engine::{EngineActor, EngineRequest, VoteRequest};
use crate::error::DomainResult;
use crate::model::{
    Comment, CommentView, CommunityFeed, CommunitySummary, Created, DirectMessage, Post, PostView,
    Removed, TargetKind, VoteOutcome,
};
use crate::pool::Routed;
use crate::post_actor::PostMessage;
use crate::user_actor::UserMessage;
use actor_runtime::{ActorId, Addr, Reply};
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for one engine.
#[derive(Clone, Debug)]
pub struct EngineClient {
    engine: Addr<EngineActor>,
    timeout: Duration,
    pin: Option<ActorId>,
    caller: Option<ActorId>,
}

impl EngineClient {
    pub fn new(engine: Addr<EngineActor>, timeout: Duration) -> Self {
        Self {
            engine,
            timeout,
            pin: None,
            caller: None,
        }
    }

    /// A copy whose requests go to pool member `pin`.
    pub fn pinned(&self, pin: ActorId) -> Self {
        Self {
            pin: Some(pin),
            ..self.clone()
        }
    }

    /// A copy whose requests are stamped with `caller` as sender.
    pub fn on_behalf_of(&self, caller: ActorId) -> Self {
        Self {
            caller: Some(caller),
            ..self.clone()
        }
    }

    fn routed<M>(&self, message: M) -> Routed<M> {
        Routed::new(self.pin, message)
    }

    async fn call<R, F>(&self, make: F) -> DomainResult<R>
    where
        F: FnOnce(Reply<DomainResult<R>>) -> EngineRequest,
    {
        self.engine
            .request_from(self.caller, make, self.timeout)
            .await?
    }

    // --- Users ---

    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> DomainResult<Created> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::User(self.routed(UserMessage::Register {
                username: username.to_string(),
                password: password.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<String> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::User(self.routed(UserMessage::Login {
                username: username.to_string(),
                password: password.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn validate_token(&self, token: &str) -> DomainResult<String> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::User(self.routed(UserMessage::ValidateToken {
                token: token.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn karma(&self, user_id: &str) -> DomainResult<i64> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::User(self.routed(UserMessage::GetKarma {
                user_id: user_id.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn feed(&self, user_id: &str) -> DomainResult<Vec<CommunityFeed>> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::User(self.routed(UserMessage::GetFeed {
                user_id: user_id.to_string(),
                reply,
            }))
        })
        .await
    }

    // --- Communities ---

    #[instrument(skip(self))]
    pub async fn create_community(
        &self,
        name: &str,
        description: &str,
        creator_id: &str,
    ) -> DomainResult<Created> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::Community(self.routed(CommunityMessage::Create {
                name: name.to_string(),
                description: description.to_string(),
                creator_id: creator_id.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn join_community(&self, community: &str, user_id: &str) -> DomainResult<()> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::Community(self.routed(CommunityMessage::Join {
                community: community.to_string(),
                user_id: user_id.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn leave_community(&self, community: &str, user_id: &str) -> DomainResult<()> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::Community(self.routed(CommunityMessage::Leave {
                community: community.to_string(),
                user_id: user_id.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn members(&self, community: &str) -> DomainResult<Vec<String>> {
        self.call(|reply| {
            EngineRequest::Community(self.routed(CommunityMessage::GetMembers {
                community: community.to_string(),
                reply,
            }))
        })
        .await
    }

    /// Every community name, sorted.
    #[instrument(skip(self))]
    pub async fn communities(&self) -> DomainResult<Vec<String>> {
        self.call(|reply| EngineRequest::Community(self.routed(CommunityMessage::GetAll { reply })))
            .await
    }

    #[instrument(skip(self))]
    pub async fn communities_for(&self, user_id: &str) -> DomainResult<Vec<CommunitySummary>> {
        self.call(|reply| {
            EngineRequest::Community(self.routed(CommunityMessage::ListForMember {
                user_id: user_id.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_community(
        &self,
        community: &str,
        requester_id: &str,
    ) -> DomainResult<Removed> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::Community(self.routed(CommunityMessage::Delete {
                community: community.to_string(),
                requester_id: requester_id.to_string(),
                reply,
            }))
        })
        .await
    }

    // --- Posts ---

    #[instrument(skip(self, content))]
    pub async fn create_post(
        &self,
        community: &str,
        title: &str,
        content: &str,
        author_id: &str,
    ) -> DomainResult<Created> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::Post(self.routed(PostMessage::Create {
                community_name: community.to_string(),
                title: title.to_string(),
                content: content.to_string(),
                author_id: author_id.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn post(&self, post_id: &str) -> DomainResult<Post> {
        self.call(|reply| {
            EngineRequest::Post(self.routed(PostMessage::Get {
                post_id: post_id.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn posts(&self, community: &str) -> DomainResult<Vec<Post>> {
        self.call(|reply| {
            EngineRequest::Post(self.routed(PostMessage::ListByCommunity {
                community: community.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> DomainResult<Vec<PostView>> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::Post(self.routed(PostMessage::Search {
                query: query.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn edit_post(
        &self,
        post_id: &str,
        author_id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> DomainResult<Post> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::Post(self.routed(PostMessage::Edit {
                post_id: post_id.to_string(),
                author_id: author_id.to_string(),
                title: title.map(str::to_string),
                content: content.map(str::to_string),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, post_id: &str, author_id: &str) -> DomainResult<Removed> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::Post(self.routed(PostMessage::Delete {
                post_id: post_id.to_string(),
                author_id: author_id.to_string(),
                reply,
            }))
        })
        .await
    }

    // --- Comments ---

    #[instrument(skip(self, content))]
    pub async fn create_comment(
        &self,
        post_id: &str,
        parent_id: Option<&str>,
        content: &str,
        author_id: &str,
    ) -> DomainResult<Created> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::Comment(self.routed(CommentMessage::Create {
                post_id: post_id.to_string(),
                parent_id: parent_id.map(str::to_string),
                content: content.to_string(),
                author_id: author_id.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn comments(&self, post_id: &str) -> DomainResult<Vec<CommentView>> {
        self.call(|reply| {
            EngineRequest::Comment(self.routed(CommentMessage::ListByPost {
                post_id: post_id.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn edit_comment(
        &self,
        comment_id: &str,
        author_id: &str,
        content: &str,
    ) -> DomainResult<Comment> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::Comment(self.routed(CommentMessage::Edit {
                comment_id: comment_id.to_string(),
                author_id: author_id.to_string(),
                content: content.to_string(),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, comment_id: &str, author_id: &str) -> DomainResult<Removed> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::Comment(self.routed(CommentMessage::Delete {
                comment_id: comment_id.to_string(),
                author_id: author_id.to_string(),
                reply,
            }))
        })
        .await
    }

    // --- Votes and direct messages ---

    #[instrument(skip(self))]
    pub async fn vote(
        &self,
        target_type: TargetKind,
        target_id: &str,
        user_id: &str,
        is_upvote: bool,
    ) -> DomainResult<VoteOutcome> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::Vote(self.routed(VoteRequest {
                target_id: target_id.to_string(),
                user_id: user_id.to_string(),
                is_upvote,
                target_type,
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self, content))]
    pub async fn send_direct_message(
        &self,
        from_user_id: &str,
        to_user_id: &str,
        content: &str,
        parent_id: Option<&str>,
    ) -> DomainResult<Created> {
        debug!("Sending request");
        self.call(|reply| {
            EngineRequest::DirectMessage(self.routed(DirectMessageMessage::Send {
                from_user_id: from_user_id.to_string(),
                to_user_id: to_user_id.to_string(),
                content: content.to_string(),
                parent_id: parent_id.map(str::to_string),
                reply,
            }))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn inbox(&self, user_id: &str) -> DomainResult<Vec<DirectMessage>> {
        self.call(|reply| {
            EngineRequest::DirectMessage(self.routed(DirectMessageMessage::ListForUser {
                user_id: user_id.to_string(),
                reply,
            }))
        })
        .await
    }
}
