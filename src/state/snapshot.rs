//! Point-in-time view of the whole turn.
//!
//! Phase derivation and the pull queries work on a `GameSnapshot` rather than
//! on the live collections, so they are pure and easy to test.

use super::response::all_responded;
use super::vote::{remaining_votes, tally_of};
use super::AppState;
use crate::phase::derive_phase;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Store version this snapshot was taken at
    pub version: u64,
    pub turn: Option<Turn>,
    pub players: HashMap<PlayerId, Player>,
    pub responses: HashMap<ResponseId, Response>,
    pub votes: Vec<VoteToken>,
    pub vote_pool: u32,
}

impl GameSnapshot {
    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.contains_key(player_id)
    }

    pub fn response(&self, player_id: &str) -> Option<&Response> {
        self.responses.get(player_id)
    }

    /// Whether every expected response is in. False without a turn.
    pub fn all_responded(&self) -> bool {
        match &self.turn {
            Some(turn) => all_responded(
                turn.judge_id.as_deref(),
                self.players.keys(),
                &self.responses,
            ),
            None => false,
        }
    }

    pub fn remaining_votes(&self) -> u32 {
        remaining_votes(self.vote_pool, self.responses.values())
    }

    pub fn tally(&self) -> Vec<TallyEntry> {
        tally_of(&self.responses)
    }

    pub fn phase_for(&self, caller: Option<&str>) -> Phase {
        derive_phase(self, caller)
    }
}

impl AppState {
    /// Take a consistent snapshot of every collection.
    ///
    /// Read locks are taken in the store's lock order so the snapshot never
    /// observes a half-applied multi-record change.
    pub async fn snapshot(&self) -> GameSnapshot {
        let turn = self.turn.read().await;
        let players = self.players.read().await;
        let responses = self.responses.read().await;
        let votes = self.votes.read().await;

        GameSnapshot {
            version: self.version(),
            turn: turn.clone(),
            players: players.clone(),
            responses: responses.clone(),
            votes: votes.clone(),
            vote_pool: self.config.vote_pool,
        }
    }

    /// Derive the phase for a caller (None = not authenticated)
    pub async fn get_phase(&self, caller: Option<&str>) -> Phase {
        self.snapshot().await.phase_for(caller)
    }
}
