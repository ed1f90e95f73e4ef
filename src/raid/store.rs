//! Process-wide mapping from channel id to battle session, persisted as a JSON snapshot.

use super::state::{BattleSession, InvariantError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, instrument};

/// A chat (channel) id, as seen by the chat platform.
pub type ChatId = u64;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session for chat {chat_id} is inconsistent: {source}")]
    Invalid {
        chat_id: ChatId,
        source: InvariantError,
    },
}

pub struct SessionStore {
    path: PathBuf,
    sessions: BTreeMap<ChatId, BattleSession>,
}

impl SessionStore {
    /// An empty store that will flush to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sessions: BTreeMap::new(),
        }
    }

    /// Loads the snapshot at `path`. A missing or unreadable snapshot yields an empty store.
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut store = Self::empty(path);
        if !path.exists() {
            info!(target: "raid.store", "no snapshot found, starting with no sessions");
            return store;
        }
        match read_snapshot(path) {
            Ok(sessions) => {
                info!(target: "raid.store", count = sessions.len(), "battle state loaded");
                store.sessions = sessions;
            }
            Err(e) => {
                error!(target: "raid.store", error = %e, "failed to load battle state, starting empty");
            }
        }
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, chat_id: ChatId) -> Option<&BattleSession> {
        self.sessions.get(&chat_id)
    }

    pub fn get_mut(&mut self, chat_id: ChatId) -> Option<&mut BattleSession> {
        self.sessions.get_mut(&chat_id)
    }

    /// Creates or replaces the session for a chat.
    pub fn put(&mut self, chat_id: ChatId, session: BattleSession) {
        self.sessions.insert(chat_id, session);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Writes the whole mapping back to disk.
    ///
    /// The snapshot is written to a sibling temp file first and renamed into place,
    /// so a failed write never truncates the previous snapshot.
    pub fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_vec(&self.sessions)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Reads and validates a snapshot. Any inconsistent session rejects the whole file.
pub fn read_snapshot(path: &Path) -> Result<BTreeMap<ChatId, BattleSession>, StoreError> {
    let raw = std::fs::read(path)?;
    let sessions: BTreeMap<ChatId, BattleSession> = serde_json::from_slice(&raw)?;
    for (&chat_id, session) in &sessions {
        session
            .validate()
            .map_err(|source| StoreError::Invalid { chat_id, source })?;
    }
    Ok(sessions)
}
