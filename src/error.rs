//! Errors surfaced by turn operations.
//!
//! Losing the judge claim is not an error; `claim_judge` reports it as `false`.

use crate::types::ResponseId;

pub type GameResult<T> = Result<T, GameError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("No active turn")]
    TurnNotFound,

    #[error("Turn {0} is not the current turn")]
    StaleTurn(String),

    #[error("Connect with a player identity first")]
    Unauthenticated,

    #[error("No response record for {0}")]
    ResponseNotFound(ResponseId),

    #[error("Only the judge can {0}")]
    NotJudge(&'static str),

    #[error("A different challenge has already been issued for this turn")]
    ChallengeAlreadySet,

    #[error("The judge has not issued a challenge yet")]
    ChallengeNotSet,

    #[error("Text must not be empty")]
    EmptyText,

    #[error("Text exceeds {max} characters")]
    TextTooLong { max: usize },

    #[error("Not every player has submitted a response")]
    NotAllResponded,

    #[error("Voting is not open")]
    VotingNotOpen,

    #[error("All {0} votes have been cast")]
    PoolExhausted(u32),

    #[error("Response {0} has no votes to retract")]
    NoVoteToRetract(ResponseId),

    #[error("Response {0} already has votes and cannot be changed")]
    ResponseHasVotes(ResponseId),

    #[error("{0} votes are still unallocated")]
    VotesOutstanding(u32),

    #[error("Voting for this turn is finished")]
    TurnFinished,
}

impl GameError {
    /// Stable code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            GameError::TurnNotFound => "TURN_NOT_FOUND",
            GameError::StaleTurn(_) => "STALE_TURN",
            GameError::Unauthenticated => "UNAUTHENTICATED",
            GameError::ResponseNotFound(_) => "RESPONSE_NOT_FOUND",
            GameError::NotJudge(_) => "NOT_JUDGE",
            GameError::ChallengeAlreadySet => "CHALLENGE_ALREADY_SET",
            GameError::ChallengeNotSet => "CHALLENGE_NOT_SET",
            GameError::EmptyText => "EMPTY_TEXT",
            GameError::TextTooLong { .. } => "TEXT_TOO_LONG",
            GameError::NotAllResponded => "NOT_ALL_RESPONDED",
            GameError::VotingNotOpen => "VOTING_NOT_OPEN",
            GameError::PoolExhausted(_) => "POOL_EXHAUSTED",
            GameError::NoVoteToRetract(_) => "NO_VOTE_TO_RETRACT",
            GameError::ResponseHasVotes(_) => "RESPONSE_HAS_VOTES",
            GameError::VotesOutstanding(_) => "VOTES_OUTSTANDING",
            GameError::TurnFinished => "TURN_FINISHED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_messages() {
        let err = GameError::NotJudge("issue a challenge");
        assert_eq!(err.code(), "NOT_JUDGE");
        assert_eq!(err.to_string(), "Only the judge can issue a challenge");

        assert_eq!(GameError::Unauthenticated.code(), "UNAUTHENTICATED");
        assert_eq!(
            GameError::ResponseHasVotes("r1".to_string()).code(),
            "RESPONSE_HAS_VOTES"
        );

        let err = GameError::PoolExhausted(6);
        assert_eq!(err.code(), "POOL_EXHAUSTED");
        assert!(err.to_string().contains('6'));
    }
}
