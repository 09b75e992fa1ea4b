// Pure lesson-state derivation. No IO, no clock: everything is a function of
// the stored record plus the externally supplied lock flag.

use serde::{Deserialize, Serialize};

use crate::domain::models::ProgressRecord;

/// Watch percentage at which a lesson counts as effectively finished for
/// navigation purposes, even before the viewer explicitly completes it.
pub const COMPLETION_THRESHOLD_PCT: u8 = 90;

/// What the player should render for a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayState {
    Locked,
    Ready,
    Completed,
}

/// Derive the display state. An external lock always wins over stored
/// progress; completion is only ever the viewer's explicit mark.
pub fn display_state(is_locked: bool, record: &ProgressRecord) -> DisplayState {
    if is_locked {
        DisplayState::Locked
    } else if record.completed {
        DisplayState::Completed
    } else {
        DisplayState::Ready
    }
}

/// Whether the viewer may move on to the next lesson: explicitly completed,
/// or watched at least [`COMPLETION_THRESHOLD_PCT`] of this one.
pub fn can_advance(record: &ProgressRecord) -> bool {
    record.completed || record.watched_pct >= COMPLETION_THRESHOLD_PCT
}

/// Whether the explicit "mark complete" action is offered. Reaching the
/// threshold never auto-completes; it only unlocks the action.
pub fn can_mark_complete(record: &ProgressRecord) -> bool {
    record.watched_pct >= COMPLETION_THRESHOLD_PCT
}
