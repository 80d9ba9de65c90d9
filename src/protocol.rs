use crate::types::*;
use serde::{Deserialize, Serialize};

/// Messages sent by a player's client. The sender's identity comes from the
/// connection, never from the message body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    Join,
    SubmitChallenge {
        text: String,
    },
    SubmitResponse {
        text: String,
    },
    /// The respondent went back to editing their answer
    ReopenResponse,
    CastVote {
        response_id: ResponseId,
    },
    RetractVote {
        response_id: ResponseId,
    },
    FinalizeVoting,
    GetPhase,
    GetVotesRemaining,
    GetAllResponded,
    GetProgress,
    GetTally,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        player_id: Option<PlayerId>,
        phase: PhaseInfo,
        server_now: String,
    },
    Joined {
        turn_id: TurnId,
        is_judge: bool,
    },
    Phase {
        phase: PhaseInfo,
    },
    VotesRemaining {
        remaining: u32,
        pool: u32,
    },
    AllResponded {
        value: bool,
    },
    Progress {
        progress: ResponseProgress,
    },
    ChallengeAccepted {
        challenge: String,
    },
    ResponseAccepted,
    ResponseReopened,
    VoteUpdate {
        response_id: ResponseId,
        vote_count: u32,
        remaining: u32,
    },
    Tally {
        entries: Vec<TallyEntry>,
        is_final: bool,
    },
    /// Broadcast after every change; clients re-pull what they display
    StateChanged {
        version: u64,
    },
    Error {
        code: String,
        msg: String,
    },
}

/// A phase together with what the UI needs to present it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseInfo {
    pub phase: Phase,
    pub label: String,
    pub view: String,
}

impl From<Phase> for PhaseInfo {
    fn from(phase: Phase) -> Self {
        Self {
            phase,
            label: phase.label().to_string(),
            view: phase.view().to_string(),
        }
    }
}

impl From<crate::error::GameError> for ServerMessage {
    fn from(e: crate::error::GameError) -> Self {
        ServerMessage::Error {
            code: e.code().to_string(),
            msg: e.to_string(),
        }
    }
}
