use super::response::seat_in;
use super::role::claim_in;
use super::AppState;
use crate::error::{GameError, GameResult};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Result of taking a seat in the current turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinOutcome {
    pub turn_id: TurnId,
    pub is_judge: bool,
}

impl AppState {
    /// Join the game and take a seat in the current turn.
    ///
    /// The first player to join becomes judge; everyone else gets a blank
    /// response record. Safe to repeat: a returning player keeps their role
    /// and their record. The roster entry, the judge claim and the record are
    /// written under one hold of the turn lock, so a turn that finishes
    /// concurrently never gains a seat.
    pub async fn join(&self, player_id: &str) -> GameResult<JoinOutcome> {
        if player_id.trim().is_empty() {
            return Err(GameError::Unauthenticated);
        }

        let (outcome, changed) = {
            let mut turn_guard = self.turn.write().await;
            let mut players = self.players.write().await;
            let mut responses = self.responses.write().await;

            let turn = turn_guard.as_mut().ok_or(GameError::TurnNotFound)?;
            if turn.is_done_vote {
                return Err(GameError::TurnFinished);
            }

            let is_new = players
                .insert(
                    player_id.to_string(),
                    Player {
                        id: player_id.to_string(),
                    },
                )
                .is_none();
            let turn_id = turn.id.clone();
            let claimed = claim_in(turn, &turn_id, player_id);
            let is_judge = turn.is_judge(player_id);
            let seated = !is_judge && seat_in(&mut responses, player_id);

            if is_new {
                tracing::info!("Player {} joined", player_id);
            }
            if claimed {
                tracing::info!("{} is now judge of turn {}", player_id, turn_id);
            }
            (JoinOutcome { turn_id, is_judge }, is_new || claimed || seated)
        };

        if changed {
            self.notify_changed();
        }
        Ok(outcome)
    }

    pub async fn has_player(&self, player_id: &str) -> bool {
        self.players.read().await.contains_key(player_id)
    }

    /// Roster ids in a stable order
    pub async fn player_ids(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self.players.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}
