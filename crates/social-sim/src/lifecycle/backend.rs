use crate::clients::EngineClient;
use crate::comment_actor::{CommentStore, SharedComments};
use crate::community_actor::{CommunityStore, SharedCommunities};
use crate::config::{BackendConfig, ConfigError};
use crate::dm_actor::{InboxStore, SharedInbox};
use crate::engine::EngineActor;
use crate::post_actor::{PostStore, SharedPosts};
use crate::user_actor::{SharedUsers, UserStore};
use actor_runtime::Addr;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// One store per domain kind, shared by every engine.
#[derive(Clone)]
pub struct Stores {
    pub users: SharedUsers,
    pub communities: SharedCommunities,
    pub posts: SharedPosts,
    pub comments: SharedComments,
    pub inbox: SharedInbox,
}

impl Stores {
    pub fn new() -> Self {
        Self {
            users: UserStore::shared(),
            communities: CommunityStore::shared(),
            posts: PostStore::shared(),
            comments: CommentStore::shared(),
            inbox: InboxStore::shared(),
        }
    }
}

impl Default for Stores {
    fn default() -> Self {
        Self::new()
    }
}

/// A set of engines over one set of stores.
pub struct Backend {
    engines: Vec<Addr<EngineActor>>,
    handles: Vec<JoinHandle<()>>,
    stores: Stores,
    config: BackendConfig,
}

impl Backend {
    pub fn start(config: BackendConfig, engines: usize) -> Result<Self, ConfigError> {
        config.validate()?;
        if engines == 0 {
            return Err(ConfigError::NotPositive { field: "engines" });
        }

        let stores = Stores::new();
        let (addrs, handles): (Vec<_>, Vec<_>) = (0..engines)
            .map(|_| EngineActor::start(&stores, &config))
            .unzip();
        info!(engines, pool_size = config.pool_size, "Backend started");

        Ok(Self {
            engines: addrs,
            handles,
            stores,
            config,
        })
    }

    pub fn engines(&self) -> &[Addr<EngineActor>] {
        &self.engines
    }

    /// An unpinned client for engine `index` (wrapping around).
    pub fn client(&self, index: usize) -> EngineClient {
        let engine = self.engines[index % self.engines.len()].clone();
        EngineClient::new(engine, self.config.client_timeout())
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Stops every engine and waits for all actors to exit.
    pub async fn shutdown(self) {
        for engine in &self.engines {
            if engine.stop().is_err() {
                warn!(engine = %engine.id(), "Engine already stopped");
            }
        }
        for handle in self.handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Engine panicked");
            }
        }
        info!("Backend stopped");
    }
}
