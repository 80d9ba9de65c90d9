//! WebSocket message dispatch
//!
//! Identity is checked here, then the message goes to the judge or
//! respondent handler modules. Queries are answered inline.

use crate::error::GameError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use std::sync::Arc;

use super::{judge, respondent};

/// Resolve the caller or return early with UNAUTHENTICATED
macro_rules! require_caller {
    ($caller:expr) => {
        match $caller {
            Some(id) => id,
            None => return Some(GameError::Unauthenticated.into()),
        }
    };
}

/// Handle client messages and return optional response
pub async fn handle_message(
    msg: ClientMessage,
    caller: Option<&str>,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Join => {
            let caller = require_caller!(caller);
            match state.join(caller).await {
                Ok(outcome) => Some(ServerMessage::Joined {
                    turn_id: outcome.turn_id,
                    is_judge: outcome.is_judge,
                }),
                Err(e) => {
                    tracing::warn!("Join by {} rejected: {}", caller, e);
                    Some(e.into())
                }
            }
        }

        // Judge messages
        ClientMessage::SubmitChallenge { text } => {
            let caller = require_caller!(caller);
            judge::handle_submit_challenge(state, caller, text).await
        }

        ClientMessage::CastVote { response_id } => {
            let caller = require_caller!(caller);
            judge::handle_cast_vote(state, caller, &response_id).await
        }

        ClientMessage::RetractVote { response_id } => {
            let caller = require_caller!(caller);
            judge::handle_retract_vote(state, caller, &response_id).await
        }

        ClientMessage::FinalizeVoting => {
            let caller = require_caller!(caller);
            judge::handle_finalize_voting(state, caller).await
        }

        // Respondent messages
        ClientMessage::SubmitResponse { text } => {
            let caller = require_caller!(caller);
            respondent::handle_submit_response(state, caller, text).await
        }

        ClientMessage::ReopenResponse => {
            let caller = require_caller!(caller);
            respondent::handle_reopen_response(state, caller).await
        }

        // Queries, open to anyone. An unidentified caller is told to authenticate
        ClientMessage::GetPhase => Some(ServerMessage::Phase {
            phase: state.get_phase(caller).await.into(),
        }),

        ClientMessage::GetVotesRemaining => Some(ServerMessage::VotesRemaining {
            remaining: state.remaining_votes().await,
            pool: state.config.vote_pool,
        }),

        ClientMessage::GetAllResponded => Some(ServerMessage::AllResponded {
            value: state.all_responded().await,
        }),

        ClientMessage::GetProgress => Some(ServerMessage::Progress {
            progress: state.response_progress().await,
        }),

        ClientMessage::GetTally => {
            let snapshot = state.snapshot().await;
            Some(ServerMessage::Tally {
                entries: snapshot.tally(),
                is_final: snapshot.turn.is_some_and(|t| t.is_done_vote),
            })
        }
    }
}

/// Id of the turn in play, or the error a mutator would give without one
pub(super) async fn current_turn_id(state: &AppState) -> Result<String, GameError> {
    state
        .current_turn()
        .await
        .map(|turn| turn.id)
        .ok_or(GameError::TurnNotFound)
}
