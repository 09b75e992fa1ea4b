// Navigation over the externally ordered lesson list. The list arrives from
// the platform already sorted and annotated; these helpers only walk it.

use crate::domain::gate;
use crate::domain::models::{LessonSummary, ProgressRecord};

/// Index of a lesson within the ordered list, by id.
pub fn position(lessons: &[LessonSummary], lesson_id: &str) -> Option<usize> {
    lessons.iter().position(|lesson| lesson.id == lesson_id)
}

/// The lesson following `lesson_id`, if any.
pub fn next_after<'a>(lessons: &'a [LessonSummary], lesson_id: &str) -> Option<&'a LessonSummary> {
    let idx = position(lessons, lesson_id)?;
    lessons.get(idx + 1)
}

/// Resolve where "continue" should take the viewer: the next unlocked lesson,
/// but only once the current record permits advancing. Locked successors and
/// end-of-course both yield `None`, which the player renders as staying put.
pub fn advance_target<'a>(
    lessons: &'a [LessonSummary],
    current_id: &str,
    record: &ProgressRecord,
) -> Option<&'a LessonSummary> {
    if !gate::can_advance(record) {
        return None;
    }
    next_after(lessons, current_id).filter(|next| !next.is_locked)
}
