use super::AppState;
use crate::types::Turn;

/// Set `judge_id` if it is unset and the turn id matches. Callers hold the
/// turn write lock.
pub(super) fn claim_in(turn: &mut Turn, turn_id: &str, caller_id: &str) -> bool {
    if turn.id == turn_id && turn.judge_id.is_none() {
        turn.judge_id = Some(caller_id.to_string());
        true
    } else {
        false
    }
}

impl AppState {
    /// Try to become the judge of the given turn.
    ///
    /// Sets `judge_id` only if it is unset, in a single write under the turn
    /// lock. Returns whether this call made the caller judge; `false` (someone
    /// else is judge, or no such turn) is an ordinary outcome.
    pub async fn claim_judge(&self, turn_id: &str, caller_id: &str) -> bool {
        let claimed = {
            let mut turn = self.turn.write().await;
            turn.as_mut().is_some_and(|t| claim_in(t, turn_id, caller_id))
        };

        if claimed {
            tracing::info!("{} is now judge of turn {}", caller_id, turn_id);
            self.notify_changed();
        } else {
            tracing::debug!("{} did not claim judge of turn {}", caller_id, turn_id);
        }
        claimed
    }
}
