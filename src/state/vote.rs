use super::response::all_responded;
use super::AppState;
use crate::error::{GameError, GameResult};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of a vote or unvote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoteReceipt {
    pub response_id: ResponseId,
    /// Token that moved
    pub token: u32,
    pub vote_count: u32,
    pub remaining: u32,
}

/// Votes left in a pool after the given responses' counts
pub fn remaining_votes<'a>(pool: u32, responses: impl IntoIterator<Item = &'a Response>) -> u32 {
    let cast: u32 = responses.into_iter().map(|r| r.vote_count).sum();
    pool.saturating_sub(cast)
}

/// Responses ordered by votes (desc), ties by player id
pub(crate) fn tally_of(responses: &HashMap<ResponseId, Response>) -> Vec<TallyEntry> {
    let mut entries: Vec<TallyEntry> = responses
        .values()
        .map(|r| TallyEntry {
            player_id: r.id.clone(),
            text: r.text.clone(),
            votes: r.vote_count,
        })
        .collect();
    entries.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.player_id.cmp(&b.player_id)));
    entries
}

pub(crate) fn fresh_arena(pool: u32) -> Vec<VoteToken> {
    (0..pool)
        .map(|index| VoteToken {
            index,
            response_id: None,
        })
        .collect()
}

fn tokens_held(votes: &[VoteToken], response_id: &str) -> u32 {
    votes
        .iter()
        .filter(|t| t.response_id.as_deref() == Some(response_id))
        .count() as u32
}

fn free_tokens(votes: &[VoteToken]) -> u32 {
    votes.iter().filter(|t| t.response_id.is_none()).count() as u32
}

#[derive(Clone, Copy)]
enum VoteMove {
    Cast,
    Retract,
}

impl AppState {
    /// Give one vote from the pool to a response
    pub async fn cast_vote(&self, caller_id: &str, response_id: &str) -> GameResult<VoteReceipt> {
        self.move_vote(caller_id, response_id, VoteMove::Cast).await
    }

    /// Take one vote back from a response
    pub async fn retract_vote(&self, caller_id: &str, response_id: &str) -> GameResult<VoteReceipt> {
        self.move_vote(caller_id, response_id, VoteMove::Retract).await
    }

    /// Claim or release a single token. The token arena and the response's
    /// count change together under their write locks, so the pool can never
    /// be overdrawn and no count can drop below zero.
    async fn move_vote(
        &self,
        caller_id: &str,
        response_id: &str,
        action: VoteMove,
    ) -> GameResult<VoteReceipt> {
        let receipt = {
            let turn = self.turn.read().await;
            let players = self.players.read().await;
            let mut responses = self.responses.write().await;
            let mut votes = self.votes.write().await;

            let turn = turn.as_ref().ok_or(GameError::TurnNotFound)?;
            if !turn.is_judge(caller_id) {
                return Err(GameError::NotJudge("vote"));
            }
            if turn.is_done_vote {
                return Err(GameError::TurnFinished);
            }
            if turn.challenge.is_none()
                || !all_responded(turn.judge_id.as_deref(), players.keys(), &responses)
            {
                return Err(GameError::VotingNotOpen);
            }
            match responses.get(response_id) {
                Some(r) if r.is_submitted => {}
                _ => return Err(GameError::ResponseNotFound(response_id.to_string())),
            }

            let token = match action {
                VoteMove::Cast => votes
                    .iter_mut()
                    .find(|t| t.response_id.is_none())
                    .ok_or(GameError::PoolExhausted(self.config.vote_pool))?,
                VoteMove::Retract => votes
                    .iter_mut()
                    .rev()
                    .find(|t| t.response_id.as_deref() == Some(response_id))
                    .ok_or_else(|| GameError::NoVoteToRetract(response_id.to_string()))?,
            };
            token.response_id = match action {
                VoteMove::Cast => Some(response_id.to_string()),
                VoteMove::Retract => None,
            };
            let index = token.index;

            let vote_count = tokens_held(&votes, response_id);
            if let Some(response) = responses.get_mut(response_id) {
                response.vote_count = vote_count;
            }

            VoteReceipt {
                response_id: response_id.to_string(),
                token: index,
                vote_count,
                remaining: free_tokens(&votes),
            }
        };

        tracing::info!(
            "Vote token {} {} {} ({} left)",
            receipt.token,
            match action {
                VoteMove::Cast => "cast for",
                VoteMove::Retract => "retracted from",
            },
            response_id,
            receipt.remaining
        );
        self.notify_changed();
        Ok(receipt)
    }

    /// Votes the judge can still hand out this turn
    pub async fn remaining_votes(&self) -> u32 {
        free_tokens(&self.votes.read().await)
    }

    /// Whether the whole pool has been allocated
    pub async fn all_votes_in(&self) -> bool {
        self.remaining_votes().await == 0
    }

    /// A player's votes this turn, or None if they have no response
    pub async fn score(&self, player_id: &str) -> Option<u32> {
        self.responses
            .read()
            .await
            .get(player_id)
            .map(|r| r.vote_count)
    }

    pub async fn tally(&self) -> Vec<TallyEntry> {
        tally_of(&*self.responses.read().await)
    }
}
