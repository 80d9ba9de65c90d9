use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type TurnId = String;
pub type PlayerId = String;
/// Responses are keyed by the id of the respondent who owns them
pub type ResponseId = PlayerId;

/// Number of votes the judge distributes per turn
pub const DEFAULT_VOTE_POOL: u32 = 6;

/// Responses expected from each respondent
pub const RESPONSES_PER_PLAYER: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    pub id: TurnId,
    pub judge_id: Option<PlayerId>,
    pub challenge: Option<String>,
    pub is_done_vote: bool,
    /// ISO timestamp of turn creation
    pub started_at: String,
}

impl Turn {
    pub fn new() -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            judge_id: None,
            challenge: None,
            is_done_vote: false,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_judge(&self, player_id: &str) -> bool {
        self.judge_id.as_deref() == Some(player_id)
    }
}

impl Default for Turn {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    pub id: ResponseId,
    pub text: Option<String>,
    pub vote_count: u32,
    pub is_submitted: bool,
}

impl Response {
    /// Blank record created when a respondent joins
    pub fn blank(id: ResponseId) -> Self {
        Self {
            id,
            text: None,
            vote_count: 0,
            is_submitted: false,
        }
    }
}

/// One unit of the judge's vote pool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoteToken {
    pub index: u32,
    pub response_id: Option<ResponseId>,
}

/// A single line of the final result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TallyEntry {
    pub player_id: PlayerId,
    pub text: Option<String>,
    pub votes: u32,
}

/// Submission progress for the current turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ResponseProgress {
    pub respondents: u32,
    pub per_player: u32,
    pub expected: u32,
    pub submitted: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Authenticating,
    FindingGame,
    JudgeMakingChallenge,
    RespondentAwaitingChallenge,
    RespondentResponding,
    RespondentAwaitingResponses,
    JudgeAwaitingResponses,
    JudgeVoting,
    RespondentAwaitingVoting,
    GameOver,
    Confused,
}

impl Phase {
    /// Human-readable description shown to the participant
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Authenticating => "Logging in",
            Phase::FindingGame => "Finding a game",
            Phase::JudgeMakingChallenge => "Making challenge",
            Phase::RespondentAwaitingChallenge => "Waiting for judge to issue challenge",
            Phase::RespondentResponding => "Making a response",
            Phase::RespondentAwaitingResponses => "Waiting for other players to respond",
            Phase::JudgeAwaitingResponses => "Waiting for players to respond",
            Phase::JudgeVoting => "Voting on responses",
            Phase::RespondentAwaitingVoting => "Waiting for judge to cast votes",
            Phase::GameOver => "Game over",
            Phase::Confused => "Confused",
        }
    }

    /// Name of the view the UI layer should render for this phase
    pub fn view(&self) -> &'static str {
        match self {
            Phase::Authenticating => "nobody",
            Phase::FindingGame => "join",
            Phase::JudgeMakingChallenge => "makeChallenge",
            Phase::RespondentAwaitingChallenge
            | Phase::RespondentAwaitingResponses
            | Phase::RespondentAwaitingVoting => "wait",
            Phase::RespondentResponding => "makeResponse",
            Phase::JudgeAwaitingResponses => "judgeAwaitsResponses",
            Phase::JudgeVoting => "voteOnResponses",
            Phase::GameOver => "endGame",
            Phase::Confused => "confused",
        }
    }
}
