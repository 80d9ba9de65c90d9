use super::response::all_responded;
use super::vote::{fresh_arena, tally_of};
use super::AppState;
use crate::error::{GameError, GameResult};
use crate::types::*;

impl AppState {
    /// Replace the current turn with a blank one.
    ///
    /// Clears the roster, every response and the vote pool. Players take a
    /// seat in the new turn through `join`, so nobody is left in the roster
    /// without a role.
    pub async fn start_turn(&self) -> Turn {
        let turn = Turn::new();
        {
            let mut current = self.turn.write().await;
            let mut players = self.players.write().await;
            let mut responses = self.responses.write().await;
            let mut votes = self.votes.write().await;

            *current = Some(turn.clone());
            players.clear();
            responses.clear();
            *votes = fresh_arena(self.config.vote_pool);
        }

        tracing::info!("Started turn {}", turn.id);
        self.notify_changed();
        turn
    }

    pub async fn current_turn(&self) -> Option<Turn> {
        self.turn.read().await.clone()
    }

    /// Issue the turn's challenge.
    ///
    /// Only the judge may do this, once per turn. Re-sending the same text is
    /// accepted and changes nothing.
    pub async fn set_challenge(&self, turn_id: &str, caller_id: &str, text: String) -> GameResult<()> {
        self.validate_text(&text)?;

        let changed = self
            .update_turn_if(turn_id, |turn| {
                if turn.is_done_vote {
                    return Err(GameError::TurnFinished);
                }
                if !turn.is_judge(caller_id) {
                    return Err(GameError::NotJudge("issue a challenge"));
                }
                if let Some(existing) = &turn.challenge {
                    return if *existing == text {
                        Ok(false)
                    } else {
                        Err(GameError::ChallengeAlreadySet)
                    };
                }
                turn.challenge = Some(text);
                Ok(true)
            })
            .await
            .inspect_err(|e| tracing::warn!("Challenge from {} rejected: {}", caller_id, e))?;

        if changed {
            tracing::info!("Judge {} issued the challenge for turn {}", caller_id, turn_id);
            self.notify_changed();
        }
        Ok(())
    }

    /// Close voting and return the final tally.
    ///
    /// Requires the challenge to be set and every response to be in. Calling
    /// it again on a finished turn returns the same tally.
    pub async fn finalize_voting(&self, turn_id: &str, caller_id: &str) -> GameResult<Vec<TallyEntry>> {
        let (tally, changed) = {
            let mut turn_guard = self.turn.write().await;
            let players = self.players.read().await;
            let responses = self.responses.read().await;
            let votes = self.votes.read().await;

            let turn = turn_guard.as_mut().ok_or(GameError::TurnNotFound)?;
            if turn.id != turn_id {
                return Err(GameError::StaleTurn(turn_id.to_string()));
            }
            if !turn.is_judge(caller_id) {
                return Err(GameError::NotJudge("finalize voting"));
            }

            if turn.is_done_vote {
                (tally_of(&responses), false)
            } else {
                if turn.challenge.is_none() {
                    return Err(GameError::ChallengeNotSet);
                }
                if !all_responded(turn.judge_id.as_deref(), players.keys(), &responses) {
                    return Err(GameError::NotAllResponded);
                }
                let remaining = votes.iter().filter(|t| t.response_id.is_none()).count() as u32;
                if self.config.require_all_votes && remaining > 0 {
                    return Err(GameError::VotesOutstanding(remaining));
                }

                turn.is_done_vote = true;
                (tally_of(&responses), true)
            }
        };

        if changed {
            tracing::info!("Voting finalized for turn {}", turn_id);
            self.notify_changed();
        }
        Ok(tally)
    }
}
