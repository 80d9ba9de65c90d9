//! Judge message handlers
//!
//! Issuing the challenge, moving vote tokens and closing the turn.

use crate::protocol::ServerMessage;
use crate::state::{AppState, VoteReceipt};
use std::sync::Arc;

use super::handlers::current_turn_id;

pub async fn handle_submit_challenge(
    state: &Arc<AppState>,
    caller: &str,
    text: String,
) -> Option<ServerMessage> {
    let turn_id = match current_turn_id(state).await {
        Ok(id) => id,
        Err(e) => return Some(e.into()),
    };

    match state.set_challenge(&turn_id, caller, text.clone()).await {
        Ok(()) => Some(ServerMessage::ChallengeAccepted { challenge: text }),
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_cast_vote(
    state: &Arc<AppState>,
    caller: &str,
    response_id: &str,
) -> Option<ServerMessage> {
    vote_reply(state.cast_vote(caller, response_id).await)
}

pub async fn handle_retract_vote(
    state: &Arc<AppState>,
    caller: &str,
    response_id: &str,
) -> Option<ServerMessage> {
    vote_reply(state.retract_vote(caller, response_id).await)
}

fn vote_reply(result: crate::error::GameResult<VoteReceipt>) -> Option<ServerMessage> {
    match result {
        Ok(receipt) => Some(ServerMessage::VoteUpdate {
            response_id: receipt.response_id,
            vote_count: receipt.vote_count,
            remaining: receipt.remaining,
        }),
        Err(e) => {
            tracing::warn!("Vote rejected: {}", e);
            Some(e.into())
        }
    }
}

pub async fn handle_finalize_voting(state: &Arc<AppState>, caller: &str) -> Option<ServerMessage> {
    let turn_id = match current_turn_id(state).await {
        Ok(id) => id,
        Err(e) => return Some(e.into()),
    };

    match state.finalize_voting(&turn_id, caller).await {
        Ok(entries) => {
            let tally = ServerMessage::Tally {
                entries,
                is_final: true,
            };
            // Everyone sees the final standings, not just the judge
            state.broadcast_to_all(tally.clone());
            Some(tally)
        }
        Err(e) => {
            tracing::warn!("Finalize by {} rejected: {}", caller, e);
            Some(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn voting_state() -> Arc<AppState> {
        let state = Arc::new(AppState::new());
        let turn = state.start_turn().await;
        for id in ["judge", "r1", "r2"] {
            state.join(id).await.unwrap();
        }
        state
            .set_challenge(&turn.id, "judge", "Name a sea".to_string())
            .await
            .unwrap();
        state.submit_response("r1", "Baltic".to_string()).await.unwrap();
        state.submit_response("r2", "Red".to_string()).await.unwrap();
        state
    }

    #[tokio::test]
    async fn test_cast_and_retract_report_counts() {
        let state = voting_state().await;

        let result = handle_cast_vote(&state, "judge", "r2").await;
        if let Some(ServerMessage::VoteUpdate {
            response_id,
            vote_count,
            remaining,
        }) = result
        {
            assert_eq!(response_id, "r2");
            assert_eq!(vote_count, 1);
            assert_eq!(remaining, 5);
        } else {
            panic!("Expected VoteUpdate message");
        }

        let result = handle_retract_vote(&state, "judge", "r2").await;
        assert!(matches!(
            result,
            Some(ServerMessage::VoteUpdate {
                vote_count: 0,
                remaining: 6,
                ..
            })
        ));

        let result = handle_retract_vote(&state, "judge", "r2").await;
        if let Some(ServerMessage::Error { code, .. }) = result {
            assert_eq!(code, "NO_VOTE_TO_RETRACT");
        } else {
            panic!("Expected Error message");
        }
    }

    #[tokio::test]
    async fn test_finalize_broadcasts_final_tally() {
        let state = voting_state().await;
        handle_cast_vote(&state, "judge", "r1").await;

        let mut rx = state.broadcast.subscribe();
        let result = handle_finalize_voting(&state, "judge").await;
        assert!(matches!(
            result,
            Some(ServerMessage::Tally { is_final: true, .. })
        ));

        // The state change notice comes first, then the tally
        let mut saw_tally = false;
        while let Ok(msg) = rx.try_recv() {
            if let ServerMessage::Tally { entries, is_final } = msg {
                assert!(is_final);
                assert_eq!(entries[0].player_id, "r1");
                saw_tally = true;
            }
        }
        assert!(saw_tally);
    }

    #[tokio::test]
    async fn test_challenge_without_turn() {
        let state = Arc::new(AppState::new());
        let result = handle_submit_challenge(&state, "judge", "Anything".to_string()).await;
        if let Some(ServerMessage::Error { code, .. }) = result {
            assert_eq!(code, "TURN_NOT_FOUND");
        } else {
            panic!("Expected Error message");
        }
    }
}
