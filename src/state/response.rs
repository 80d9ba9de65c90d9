use super::AppState;
use crate::error::{GameError, GameResult};
use crate::types::*;
use std::collections::HashMap;

/// Whether every expected response is in.
///
/// Both conditions matter: no record may be unsubmitted, and every roster
/// player except the judge must own a submitted record. The second check
/// catches a player who never got a record at all. Records are keyed by
/// respondent, so nobody can hold more than one.
pub fn all_responded<'a>(
    judge_id: Option<&str>,
    roster: impl IntoIterator<Item = &'a PlayerId>,
    responses: &HashMap<ResponseId, Response>,
) -> bool {
    let none_unsubmitted = responses.values().all(|r| r.is_submitted);

    none_unsubmitted
        && roster
            .into_iter()
            .filter(|id| Some(id.as_str()) != judge_id)
            .all(|id| responses.get(id).is_some_and(|r| r.is_submitted))
}

/// Insert a blank record unless the player already has one
pub(super) fn seat_in(responses: &mut HashMap<ResponseId, Response>, player_id: &str) -> bool {
    if responses.contains_key(player_id) {
        return false;
    }
    responses.insert(player_id.to_string(), Response::blank(player_id.to_string()));
    true
}

impl AppState {
    /// Create a blank response record for a respondent if none exists.
    /// Returns whether a record was created. A finished turn takes no new
    /// respondents.
    pub async fn register_responder(&self, player_id: &str) -> GameResult<bool> {
        let created = {
            let turn = self.turn.read().await;
            let turn = turn.as_ref().ok_or(GameError::TurnNotFound)?;
            if turn.is_done_vote {
                return Err(GameError::TurnFinished);
            }
            seat_in(&mut *self.responses.write().await, player_id)
        };

        if created {
            tracing::info!("Registered responder {}", player_id);
            self.notify_changed();
        }
        Ok(created)
    }

    /// Submit (or resubmit) a respondent's answer
    pub async fn submit_response(&self, player_id: &str, text: String) -> GameResult<()> {
        self.validate_text(&text)?;

        {
            // Holding the turn read lock keeps finalization out until we are done
            let turn = self.turn.read().await;
            let turn = turn.as_ref().ok_or(GameError::TurnNotFound)?;
            if turn.is_done_vote {
                return Err(GameError::TurnFinished);
            }
            if turn.challenge.is_none() {
                return Err(GameError::ChallengeNotSet);
            }

            let mut responses = self.responses.write().await;
            let response = responses
                .get_mut(player_id)
                .ok_or_else(|| GameError::ResponseNotFound(player_id.to_string()))?;
            // Votes stay with the text the judge saw
            if response.vote_count > 0 && response.text.as_deref() != Some(text.as_str()) {
                return Err(GameError::ResponseHasVotes(player_id.to_string()));
            }
            response.text = Some(text);
            response.is_submitted = true;
        }

        tracing::info!("Response submitted by {}", player_id);
        self.notify_changed();
        Ok(())
    }

    /// Mark a response as being edited again. The text is kept.
    pub async fn reopen_response(&self, player_id: &str) -> GameResult<()> {
        {
            let turn = self.turn.read().await;
            let turn = turn.as_ref().ok_or(GameError::TurnNotFound)?;
            if turn.is_done_vote {
                return Err(GameError::TurnFinished);
            }

            let mut responses = self.responses.write().await;
            let response = responses
                .get_mut(player_id)
                .ok_or_else(|| GameError::ResponseNotFound(player_id.to_string()))?;
            response.is_submitted = false;
        }

        tracing::info!("Response reopened by {}", player_id);
        self.notify_changed();
        Ok(())
    }

    /// Whether every expected response for the current turn is in
    pub async fn all_responded(&self) -> bool {
        self.snapshot().await.all_responded()
    }

    /// How many responses are expected and how many are in
    pub async fn response_progress(&self) -> ResponseProgress {
        let responses = self.responses.read().await;
        let respondents = responses.len() as u32;
        let submitted = responses.values().filter(|r| r.is_submitted).count() as u32;

        ResponseProgress {
            respondents,
            per_player: RESPONSES_PER_PLAYER,
            expected: RESPONSES_PER_PLAYER * respondents,
            submitted,
        }
    }
}
