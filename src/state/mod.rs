mod player;
mod response;
mod role;
pub mod snapshot;
mod turn;
mod vote;

pub use player::JoinOutcome;
pub use response::all_responded;
pub use vote::{remaining_votes, VoteReceipt};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::protocol::ServerMessage;
use crate::types::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Shared game state
///
/// Each collection sits behind its own lock and a write to one record is
/// atomic. Operations that touch several collections acquire the locks in the
/// order turn, players, responses, votes and never the other way round.
#[derive(Clone)]
pub struct AppState {
    pub config: GameConfig,
    pub turn: Arc<RwLock<Option<Turn>>>,
    pub players: Arc<RwLock<HashMap<PlayerId, Player>>>,
    pub responses: Arc<RwLock<HashMap<ResponseId, Response>>>,
    /// Vote token arena for the current turn
    pub votes: Arc<RwLock<Vec<VoteToken>>>,
    version: Arc<AtomicU64>,
    /// Change notifications for every connected client
    pub broadcast: broadcast::Sender<ServerMessage>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            config,
            turn: Arc::new(RwLock::new(None)),
            players: Arc::new(RwLock::new(HashMap::new())),
            responses: Arc::new(RwLock::new(HashMap::new())),
            votes: Arc::new(RwLock::new(Vec::new())),
            version: Arc::new(AtomicU64::new(0)),
            broadcast: tx,
        }
    }

    /// Monotonic counter bumped on every successful mutation
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Send a message to every connected client
    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        // No receivers connected is fine
        let _ = self.broadcast.send(msg);
    }

    /// Record a mutation and tell clients to re-pull their phase
    pub(crate) fn notify_changed(&self) {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        self.broadcast_to_all(ServerMessage::StateChanged { version });
    }

    /// Conditional update of the turn record.
    ///
    /// `apply` runs under the turn's write lock, so its checks and its writes
    /// form one atomic step. It must check everything before writing; an `Err`
    /// is returned to the caller unchanged.
    pub async fn update_turn_if<T>(
        &self,
        turn_id: &str,
        apply: impl FnOnce(&mut Turn) -> GameResult<T>,
    ) -> GameResult<T> {
        let mut guard = self.turn.write().await;
        let turn = guard.as_mut().ok_or(GameError::TurnNotFound)?;
        if turn.id != turn_id {
            return Err(GameError::StaleTurn(turn_id.to_string()));
        }
        apply(turn)
    }

    /// Reject blank or oversized player-authored text
    pub(crate) fn validate_text(&self, text: &str) -> GameResult<()> {
        if text.trim().is_empty() {
            return Err(GameError::EmptyText);
        }
        let max = self.config.max_text_chars;
        if text.chars().count() > max {
            return Err(GameError::TextTooLong { max });
        }
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
