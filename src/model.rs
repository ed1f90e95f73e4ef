//! Shared data structures stored in Serenity's global context.

use crate::config::Config;
use crate::raid::SessionStore;
use serenity::prelude::TypeMapKey;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The central, shared state of the application.
/// An `Arc<AppState>` is stored in the global context for access from any handler.
pub struct AppState {
    pub config: Config,
    /// All battle sessions, keyed by channel. Writers hold the lock across
    /// read, mutate and flush so concurrent commands never lose an update.
    pub sessions: Arc<RwLock<SessionStore>>,
}

impl AppState {
    pub fn new(config: Config, store: SessionStore) -> Self {
        Self {
            config,
            sessions: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn from_ctx(ctx: &serenity::prelude::Context) -> Option<Arc<Self>> {
        ctx.data.read().await.get::<AppState>().cloned()
    }
}

impl TypeMapKey for AppState {
    type Value = Arc<AppState>;
}
