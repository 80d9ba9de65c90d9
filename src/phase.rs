//! Phase derivation
//!
//! Every participant is in exactly one phase, computed from a snapshot and the
//! caller's identity. The phases are an ordered table of named predicates; the
//! first match wins and `Confused` catches anything the table misses. Apart
//! from the two identity checks, every predicate pins the full combination of
//! facts it covers, so at most one of them can hold for a given input.

use crate::state::snapshot::GameSnapshot;
use crate::types::Phase;

/// Facts about one caller, computed once per derivation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseFacts {
    pub identified: bool,
    pub in_roster: bool,
    pub has_turn: bool,
    pub is_judge: bool,
    pub has_challenge: bool,
    pub has_submitted: bool,
    pub all_responded: bool,
    pub is_done_vote: bool,
}

impl PhaseFacts {
    pub fn gather(snapshot: &GameSnapshot, caller: Option<&str>) -> Self {
        let Some(caller) = caller else {
            return Self::default();
        };
        let turn = snapshot.turn.as_ref();

        Self {
            identified: true,
            in_roster: snapshot.has_player(caller),
            has_turn: turn.is_some(),
            is_judge: turn.is_some_and(|t| t.is_judge(caller)),
            has_challenge: turn.is_some_and(|t| t.challenge.is_some()),
            has_submitted: snapshot.response(caller).is_some_and(|r| r.is_submitted),
            all_responded: snapshot.all_responded(),
            is_done_vote: turn.is_some_and(|t| t.is_done_vote),
        }
    }

    /// Seated in a live turn: the precondition for every in-game phase
    /// except `GameOver`
    fn playing(&self) -> bool {
        self.identified && self.in_roster && self.has_turn && !self.is_done_vote
    }
}

type Predicate = fn(&PhaseFacts) -> bool;

fn authenticating(f: &PhaseFacts) -> bool {
    !f.identified
}

fn finding_game(f: &PhaseFacts) -> bool {
    f.identified && !f.in_roster
}

fn judge_making_challenge(f: &PhaseFacts) -> bool {
    f.playing() && f.is_judge && !f.has_challenge
}

fn respondent_awaiting_challenge(f: &PhaseFacts) -> bool {
    f.playing() && !f.is_judge && !f.has_challenge
}

fn respondent_responding(f: &PhaseFacts) -> bool {
    f.playing() && !f.is_judge && f.has_challenge && !f.has_submitted
}

fn respondent_awaiting_responses(f: &PhaseFacts) -> bool {
    f.playing() && !f.is_judge && f.has_challenge && f.has_submitted && !f.all_responded
}

fn judge_awaiting_responses(f: &PhaseFacts) -> bool {
    f.playing() && f.is_judge && f.has_challenge && !f.all_responded
}

fn judge_voting(f: &PhaseFacts) -> bool {
    f.playing() && f.is_judge && f.has_challenge && f.all_responded
}

fn respondent_awaiting_voting(f: &PhaseFacts) -> bool {
    f.playing() && !f.is_judge && f.has_challenge && f.has_submitted && f.all_responded
}

fn game_over(f: &PhaseFacts) -> bool {
    f.identified && f.in_roster && f.has_turn && f.is_done_vote
}

/// Evaluation order; the first matching entry is the caller's phase
pub const PHASE_TABLE: &[(Phase, Predicate)] = &[
    (Phase::Authenticating, authenticating),
    (Phase::FindingGame, finding_game),
    (Phase::JudgeMakingChallenge, judge_making_challenge),
    (Phase::RespondentAwaitingChallenge, respondent_awaiting_challenge),
    (Phase::RespondentResponding, respondent_responding),
    (Phase::RespondentAwaitingResponses, respondent_awaiting_responses),
    (Phase::JudgeAwaitingResponses, judge_awaiting_responses),
    (Phase::JudgeVoting, judge_voting),
    (Phase::RespondentAwaitingVoting, respondent_awaiting_voting),
    (Phase::GameOver, game_over),
];

/// Evaluate the table against precomputed facts
pub fn phase_from_facts(facts: &PhaseFacts) -> Phase {
    PHASE_TABLE
        .iter()
        .find(|(_, holds)| holds(facts))
        .map(|(phase, _)| *phase)
        .unwrap_or(Phase::Confused)
}

/// All table entries that hold for the facts (for auditing exclusivity)
pub fn matching_phases(facts: &PhaseFacts) -> Vec<Phase> {
    PHASE_TABLE
        .iter()
        .filter(|(_, holds)| holds(facts))
        .map(|(phase, _)| *phase)
        .collect()
}

/// Derive the caller's phase. Never fails; inconsistent input yields `Confused`.
pub fn derive_phase(snapshot: &GameSnapshot, caller: Option<&str>) -> Phase {
    phase_from_facts(&PhaseFacts::gather(snapshot, caller))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Player, Response, Turn};

    fn snapshot_with(judge: Option<&str>, challenge: Option<&str>, done: bool) -> GameSnapshot {
        let mut snapshot = GameSnapshot {
            vote_pool: 6,
            ..Default::default()
        };
        snapshot.turn = Some(Turn {
            judge_id: judge.map(str::to_string),
            challenge: challenge.map(str::to_string),
            is_done_vote: done,
            ..Turn::new()
        });
        for id in ["judge", "r1", "r2"] {
            snapshot.players.insert(id.to_string(), Player { id: id.to_string() });
        }
        for id in ["r1", "r2"] {
            snapshot
                .responses
                .insert(id.to_string(), Response::blank(id.to_string()));
        }
        snapshot
    }

    fn submit(snapshot: &mut GameSnapshot, id: &str) {
        let response = snapshot.responses.get_mut(id).unwrap();
        response.text = Some(format!("answer from {}", id));
        response.is_submitted = true;
    }

    #[test]
    fn test_no_identity_is_authenticating() {
        assert_eq!(derive_phase(&GameSnapshot::default(), None), Phase::Authenticating);

        let mut snapshot = snapshot_with(Some("judge"), Some("c"), true);
        submit(&mut snapshot, "r1");
        assert_eq!(derive_phase(&snapshot, None), Phase::Authenticating);
    }

    #[test]
    fn test_stranger_is_finding_game() {
        let snapshot = snapshot_with(Some("judge"), None, false);
        assert_eq!(derive_phase(&snapshot, Some("stranger")), Phase::FindingGame);
    }

    #[test]
    fn test_before_challenge() {
        let snapshot = snapshot_with(Some("judge"), None, false);
        assert_eq!(
            derive_phase(&snapshot, Some("judge")),
            Phase::JudgeMakingChallenge
        );
        assert_eq!(
            derive_phase(&snapshot, Some("r1")),
            Phase::RespondentAwaitingChallenge
        );
    }

    #[test]
    fn test_partial_responses() {
        let mut snapshot = snapshot_with(Some("judge"), Some("Name a fruit"), false);
        submit(&mut snapshot, "r1");

        assert_eq!(
            derive_phase(&snapshot, Some("judge")),
            Phase::JudgeAwaitingResponses
        );
        assert_eq!(derive_phase(&snapshot, Some("r2")), Phase::RespondentResponding);

        // The submitted respondent is not yet awaiting votes
        let phase = derive_phase(&snapshot, Some("r1"));
        assert_ne!(phase, Phase::RespondentAwaitingVoting);
        assert_ne!(phase, Phase::Confused);
        assert_eq!(phase, Phase::RespondentAwaitingResponses);
    }

    #[test]
    fn test_all_responded() {
        let mut snapshot = snapshot_with(Some("judge"), Some("Name a fruit"), false);
        submit(&mut snapshot, "r1");
        submit(&mut snapshot, "r2");

        assert_eq!(derive_phase(&snapshot, Some("judge")), Phase::JudgeVoting);
        assert_eq!(
            derive_phase(&snapshot, Some("r1")),
            Phase::RespondentAwaitingVoting
        );
    }

    #[test]
    fn test_done_vote_is_game_over_for_everyone() {
        let mut snapshot = snapshot_with(Some("judge"), Some("Name a fruit"), true);
        submit(&mut snapshot, "r1");
        submit(&mut snapshot, "r2");
        for caller in ["judge", "r1", "r2"] {
            assert_eq!(derive_phase(&snapshot, Some(caller)), Phase::GameOver);
        }

        // Even a respondent who never submitted
        let snapshot = snapshot_with(Some("judge"), Some("Name a fruit"), true);
        assert_eq!(derive_phase(&snapshot, Some("r2")), Phase::GameOver);
        assert_eq!(derive_phase(&snapshot, Some("judge")), Phase::GameOver);
    }

    #[test]
    fn test_missing_turn_is_confused() {
        let mut snapshot = snapshot_with(None, None, false);
        snapshot.turn = None;
        assert_eq!(derive_phase(&snapshot, Some("r1")), Phase::Confused);
        assert_eq!(derive_phase(&snapshot, Some("stranger")), Phase::FindingGame);
    }

    #[test]
    fn test_no_judge_yet_everyone_waits() {
        let snapshot = snapshot_with(None, None, false);
        assert_eq!(
            derive_phase(&snapshot, Some("judge")),
            Phase::RespondentAwaitingChallenge
        );
    }

    #[test]
    fn test_table_is_mutually_exclusive() {
        // Every combination of facts matches at most one entry
        for bits in 0u16..(1 << 8) {
            let bit = |n: u16| bits & (1 << n) != 0;
            let facts = PhaseFacts {
                identified: bit(0),
                in_roster: bit(1),
                has_turn: bit(2),
                is_judge: bit(3),
                has_challenge: bit(4),
                has_submitted: bit(5),
                all_responded: bit(6),
                is_done_vote: bit(7),
            };
            let matches = matching_phases(&facts);
            assert!(
                matches.len() <= 1,
                "facts {:?} matched {:?}",
                facts,
                matches
            );
            let expected = matches.first().copied().unwrap_or(Phase::Confused);
            assert_eq!(phase_from_facts(&facts), expected);
        }
    }

    #[test]
    fn test_inconsistent_facts_still_resolve() {
        // Only reachable from a hand-built inconsistent snapshot
        let facts = PhaseFacts {
            identified: true,
            in_roster: true,
            has_turn: true,
            is_judge: false,
            has_challenge: true,
            has_submitted: false,
            all_responded: true,
            is_done_vote: false,
        };
        assert_eq!(phase_from_facts(&facts), Phase::RespondentResponding);

        let facts = PhaseFacts {
            has_challenge: false,
            is_judge: true,
            ..PhaseFacts::default()
        };
        assert_eq!(phase_from_facts(&facts), Phase::Authenticating);
    }
}
