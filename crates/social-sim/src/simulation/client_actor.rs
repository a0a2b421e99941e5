//! # Client Actor
//!
//! A synthetic user. On start it registers and logs in against its assigned
//! engine, then on every wake tick performs one weighted random action and
//! reports the outcome to the controller.

use super::controller::{ControllerMessage, SimulationController};
use super::metrics::{ActionKind, MetricsRecord};
use crate::clients::EngineClient;
use crate::config::ClientConfig;
use crate::error::DomainResult;
use crate::model::TargetKind;
use actor_runtime::{Actor, ActorId, Addr, Context, Reply};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Relative frequency of each steady-state action.
const ACTION_WEIGHTS: [(ActionKind, u32); 10] = [
    (ActionKind::CreateCommunity, 1),
    (ActionKind::JoinCommunity, 2),
    (ActionKind::LeaveCommunity, 1),
    (ActionKind::CreatePost, 3),
    (ActionKind::CreateComment, 3),
    (ActionKind::VotePost, 3),
    (ActionKind::VoteComment, 2),
    (ActionKind::SendDm, 1),
    (ActionKind::Search, 1),
    (ActionKind::GetFeed, 1),
];

/// Chance that a new comment replies to one of the client's own comments.
const REPLY_PROBABILITY: f64 = 0.3;

#[derive(Debug)]
pub enum ClientMessage {
    /// Performs one action now, outside the wake schedule.
    Act,
    /// Performs the given action now.
    Perform(ActionKind),
    Snapshot { reply: Reply<ClientSnapshot> },
}

/// What a client has accumulated so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSnapshot {
    pub username: Option<String>,
    pub logged_in: bool,
    pub created: Vec<String>,
    pub joined: Vec<String>,
    pub posts: usize,
    pub comments: usize,
}

struct OwnComment {
    post_id: String,
    comment_id: String,
    served_by: ActorId,
}

pub struct ClientActor {
    index: usize,
    client: EngineClient,
    controller: Addr<SimulationController>,
    rng: ChaCha8Rng,
    delay: Duration,
    username: Option<String>,
    token: Option<String>,
    /// Communities this client created.
    created: Vec<String>,
    /// Communities joined after creation by someone else.
    joined: Vec<String>,
    posts: Vec<(String, ActorId)>,
    comments: Vec<OwnComment>,
}

impl ClientActor {
    pub fn new(
        index: usize,
        client: EngineClient,
        controller: Addr<SimulationController>,
        seed: u64,
        config: &ClientConfig,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let delay = Duration::from_millis(
            rng.gen_range(config.min_action_delay_ms..=config.max_action_delay_ms),
        );
        Self {
            index,
            client,
            controller,
            rng,
            delay,
            username: None,
            token: None,
            created: Vec::new(),
            joined: Vec::new(),
            posts: Vec::new(),
            comments: Vec::new(),
        }
    }

    fn report(&self, ctx: &mut Context<Self>, record: MetricsRecord) {
        ctx.send(&self.controller, ControllerMessage::Metrics(record));
    }

    /// Runs `call`, timing it and reporting the outcome.
    async fn measure<T, F>(
        &self,
        ctx: &mut Context<Self>,
        action: ActionKind,
        call: F,
    ) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>> + Send,
        T: Send,
    {
        let started = Instant::now();
        let result = call.await;
        self.report(ctx, MetricsRecord::from_result(action, started.elapsed(), &result));
        result
    }

    fn content(&mut self) -> String {
        format!("content_{}", self.rng.gen_range(0..10_000))
    }

    fn communities(&self) -> Vec<String> {
        self.created
            .iter()
            .chain(self.joined.iter())
            .cloned()
            .collect()
    }

    async fn sign_up(&mut self, ctx: &mut Context<Self>) -> DomainResult<()> {
        let username = format!("user_{}_{}", self.index, self.rng.gen::<u32>());
        let password = format!("pass_{}", self.rng.gen::<u32>());

        let client = self.client.clone();
        self.measure(ctx, ActionKind::Register, client.register(&username, &password))
            .await?;
        self.username = Some(username.clone());

        let token = self
            .measure(ctx, ActionKind::Login, client.login(&username, &password))
            .await?;
        self.token = Some(token);
        Ok(())
    }

    async fn act(&mut self, ctx: &mut Context<Self>) {
        let action = ACTION_WEIGHTS
            .choose_weighted(&mut self.rng, |(_, weight)| *weight)
            .map(|(action, _)| *action)
            .unwrap_or(ActionKind::CreateCommunity);
        self.perform(ctx, action).await;
    }

    /// Runs `action`, or creates a community when it has no valid target.
    async fn perform(&mut self, ctx: &mut Context<Self>, action: ActionKind) {
        let Some(user) = self.username.clone() else {
            return;
        };
        let handled = match action {
            ActionKind::JoinCommunity => self.join(ctx, &user).await,
            ActionKind::LeaveCommunity => self.leave(ctx, &user).await,
            ActionKind::CreatePost => self.create_post(ctx, &user).await,
            ActionKind::CreateComment => self.create_comment(ctx, &user).await,
            ActionKind::VotePost => self.vote_post(ctx, &user).await,
            ActionKind::VoteComment => self.vote_comment(ctx, &user).await,
            ActionKind::SendDm => self.send_dm(ctx, &user).await,
            ActionKind::Search => {
                let query = format!("post_{}", self.rng.gen_range(0..100));
                let client = self.client.clone();
                let _ = self.measure(ctx, ActionKind::Search, client.search(&query)).await;
                true
            }
            ActionKind::GetFeed => {
                let client = self.client.clone();
                let _ = self.measure(ctx, ActionKind::GetFeed, client.feed(&user)).await;
                true
            }
            ActionKind::CreateCommunity | ActionKind::Register | ActionKind::Login => false,
        };
        if !handled {
            self.create_community(ctx, &user).await;
        }
    }

    async fn create_community(&mut self, ctx: &mut Context<Self>, user: &str) {
        let name = format!("community_{}_{}", self.index, self.rng.gen_range(0..10_000));
        let description = self.content();
        let client = self.client.clone();
        let call = client.create_community(&name, &description, user);
        if let Ok(created) = self.measure(ctx, ActionKind::CreateCommunity, call).await {
            self.created.push(created.id);
        }
    }

    /// Joins a community this client is not yet in; `false` if there is none.
    async fn join(&mut self, ctx: &mut Context<Self>, user: &str) -> bool {
        let mine = self.communities();
        let available: Vec<String> = match self.client.communities().await {
            Ok(all) => all.into_iter().filter(|c| !mine.contains(c)).collect(),
            Err(e) => {
                debug!(error = %e, "Listing communities failed");
                return false;
            }
        };
        let Some(community) = available.choose(&mut self.rng).cloned() else {
            return false;
        };
        let client = self.client.clone();
        let call = client.join_community(&community, user);
        if self.measure(ctx, ActionKind::JoinCommunity, call).await.is_ok() {
            self.joined.push(community);
        }
        true
    }

    /// Leaves a joined (never a created) community.
    async fn leave(&mut self, ctx: &mut Context<Self>, user: &str) -> bool {
        if self.joined.is_empty() {
            return false;
        }
        let at = self.rng.gen_range(0..self.joined.len());
        let community = self.joined[at].clone();
        let client = self.client.clone();
        let call = client.leave_community(&community, user);
        if self.measure(ctx, ActionKind::LeaveCommunity, call).await.is_ok() {
            self.joined.swap_remove(at);
        }
        true
    }

    async fn create_post(&mut self, ctx: &mut Context<Self>, user: &str) -> bool {
        let Some(community) = self.communities().choose(&mut self.rng).cloned() else {
            return false;
        };
        let title = format!("post_{}", self.rng.gen_range(0..10_000));
        let content = self.content();
        let client = self.client.clone();
        let call = client.create_post(&community, &title, &content, user);
        if let Ok(created) = self.measure(ctx, ActionKind::CreatePost, call).await {
            self.posts.push((created.id, created.served_by));
        }
        true
    }

    async fn create_comment(&mut self, ctx: &mut Context<Self>, user: &str) -> bool {
        let reply_to = if !self.comments.is_empty() && self.rng.gen_bool(REPLY_PROBABILITY) {
            self.comments.choose(&mut self.rng).map(|c| {
                (c.post_id.clone(), Some(c.comment_id.clone()), Some(c.served_by))
            })
        } else {
            self.posts
                .choose(&mut self.rng)
                .map(|(post_id, _)| (post_id.clone(), None, None))
        };
        let Some((post_id, parent_id, pin)) = reply_to else {
            return false;
        };

        let content = self.content();
        let client = match pin {
            Some(pin) => self.client.pinned(pin),
            None => self.client.clone(),
        };
        let call = client.create_comment(&post_id, parent_id.as_deref(), &content, user);
        if let Ok(created) = self.measure(ctx, ActionKind::CreateComment, call).await {
            self.comments.push(OwnComment {
                post_id,
                comment_id: created.id,
                served_by: created.served_by,
            });
        }
        true
    }

    /// Messages another member of one of this client's communities.
    async fn send_dm(&mut self, ctx: &mut Context<Self>, user: &str) -> bool {
        let Some(community) = self.communities().choose(&mut self.rng).cloned() else {
            return false;
        };
        let members = match self.client.members(&community).await {
            Ok(members) => members,
            Err(e) => {
                debug!(%community, error = %e, "Listing members failed");
                return false;
            }
        };
        let others: Vec<String> = members.into_iter().filter(|m| m != user).collect();
        let Some(to) = others.choose(&mut self.rng).cloned() else {
            return false;
        };

        let content = self.content();
        let client = self.client.clone();
        let call = client.send_direct_message(user, &to, &content, None);
        let _ = self.measure(ctx, ActionKind::SendDm, call).await;
        true
    }

    async fn vote_post(&mut self, ctx: &mut Context<Self>, user: &str) -> bool {
        let Some((post_id, pin)) = self.posts.choose(&mut self.rng).cloned() else {
            return false;
        };
        let is_upvote = self.rng.gen_bool(0.5);
        let client = self.client.pinned(pin);
        let call = client.vote(TargetKind::Post, &post_id, user, is_upvote);
        let _ = self.measure(ctx, ActionKind::VotePost, call).await;
        true
    }

    async fn vote_comment(&mut self, ctx: &mut Context<Self>, user: &str) -> bool {
        let Some((comment_id, pin)) = self
            .comments
            .choose(&mut self.rng)
            .map(|c| (c.comment_id.clone(), c.served_by))
        else {
            return false;
        };
        let is_upvote = self.rng.gen_bool(0.5);
        let client = self.client.pinned(pin);
        let call = client.vote(TargetKind::Comment, &comment_id, user, is_upvote);
        let _ = self.measure(ctx, ActionKind::VoteComment, call).await;
        true
    }

    fn snapshot(&self) -> ClientSnapshot {
        ClientSnapshot {
            username: self.username.clone(),
            logged_in: self.token.is_some(),
            created: self.created.clone(),
            joined: self.joined.clone(),
            posts: self.posts.len(),
            comments: self.comments.len(),
        }
    }
}

#[async_trait]
impl Actor for ClientActor {
    type Message = ClientMessage;

    async fn started(&mut self, ctx: &mut Context<Self>) {
        self.client = self.client.on_behalf_of(ctx.id());
        match self.sign_up(ctx).await {
            Ok(()) => ctx.set_wake_timer(self.delay),
            Err(e) => warn!(index = self.index, error = %e, "Client could not sign up"),
        }
    }

    async fn handle(&mut self, msg: ClientMessage, ctx: &mut Context<Self>) {
        match msg {
            ClientMessage::Act => self.act(ctx).await,
            ClientMessage::Perform(action) => self.perform(ctx, action).await,
            ClientMessage::Snapshot { reply } => {
                reply.respond(self.snapshot());
            }
        }
    }

    async fn wake(&mut self, ctx: &mut Context<Self>) {
        self.act(ctx).await;
    }
}
