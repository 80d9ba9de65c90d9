//! HTTP API endpoints for the operator.
//!
//! Players talk over the WebSocket; these routes let whoever runs the game
//! inspect the turn and move it along.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::snapshot::GameSnapshot;
use crate::state::AppState;
use crate::types::{TallyEntry, Turn};

/// Standings for the current turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyResponse {
    pub entries: Vec<TallyEntry>,
    pub remaining: u32,
    pub is_final: bool,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/snapshot", get(snapshot))
        .route("/api/tally", get(tally))
        .route("/api/turn", post(start_turn))
        .route("/health", get(health))
}

/// Full state of the current turn.
///
/// GET /api/snapshot
pub async fn snapshot(State(state): State<Arc<AppState>>) -> Json<GameSnapshot> {
    Json(state.snapshot().await)
}

/// GET /api/tally
pub async fn tally(State(state): State<Arc<AppState>>) -> Json<TallyResponse> {
    let snapshot = state.snapshot().await;
    Json(TallyResponse {
        entries: snapshot.tally(),
        remaining: snapshot.remaining_votes(),
        is_final: snapshot.turn.is_some_and(|t| t.is_done_vote),
    })
}

/// Start a new turn. Everyone joins again to take a seat.
///
/// POST /api/turn
pub async fn start_turn(State(state): State<Arc<AppState>>) -> Json<Turn> {
    Json(state.start_turn().await)
}

pub async fn health() -> &'static str {
    "OK"
}
