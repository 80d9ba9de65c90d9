//! Respondent message handlers

use crate::protocol::ServerMessage;
use crate::state::AppState;
use std::sync::Arc;

pub async fn handle_submit_response(
    state: &Arc<AppState>,
    caller: &str,
    text: String,
) -> Option<ServerMessage> {
    match state.submit_response(caller, text).await {
        Ok(()) => Some(ServerMessage::ResponseAccepted),
        Err(e) => {
            tracing::warn!("Response from {} rejected: {}", caller, e);
            Some(e.into())
        }
    }
}

pub async fn handle_reopen_response(state: &Arc<AppState>, caller: &str) -> Option<ServerMessage> {
    match state.reopen_response(caller).await {
        Ok(()) => Some(ServerMessage::ResponseReopened),
        Err(e) => {
            tracing::warn!("Reopen by {} rejected: {}", caller, e);
            Some(e.into())
        }
    }
}
