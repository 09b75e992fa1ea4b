// Domain models shared by the HTTP surface, the storage port, and the player SDK.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound for a watch percentage; writes above it are clamped.
pub const MAX_WATCHED_PCT: u8 = 100;

/// One viewer's progress on one lesson.
///
/// The remote store owns the canonical copy; the player cache holds a
/// write-through shadow serialized with exactly these field names, so the
/// serde shape here doubles as the wire and cache format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub watched_pct: u8,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        ProgressRecord {
            watched_pct: 0,
            completed: false,
            completed_at: None,
        }
    }
}

impl ProgressRecord {
    /// Merge a new watch percentage, clamped to 0..=100. Completion fields are
    /// untouched: rewinding below the threshold does not undo a lesson.
    pub fn with_watched(mut self, pct: u8) -> Self {
        self.watched_pct = pct.min(MAX_WATCHED_PCT);
        self
    }

    /// Merge a completion toggle. Completing stamps the supplied clock value;
    /// undoing clears the stamp.
    pub fn with_completed(mut self, done: bool, now: DateTime<Utc>) -> Self {
        self.completed = done;
        self.completed_at = done.then_some(now);
        self
    }

    /// Normalize an incoming record the way the store persists it: clamp the
    /// percentage, stamp `completed_at` when completing without a supplied
    /// timestamp, clear it whenever the record is not completed.
    pub fn normalized(mut self, now: DateTime<Utc>) -> Self {
        self.watched_pct = self.watched_pct.min(MAX_WATCHED_PCT);
        self.completed_at = if self.completed {
            Some(self.completed_at.unwrap_or(now))
        } else {
            None
        };
        self
    }
}

/// Composite identity of a progress record. Slugs are opaque strings with no
/// referential integrity against a catalog; `user_id` is caller-supplied and
/// unverified here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgressKey {
    pub user_id: String,
    pub course_slug: String,
    pub lesson_slug: String,
}

impl ProgressKey {
    pub fn new(
        user_id: impl Into<String>,
        course_slug: impl Into<String>,
        lesson_slug: impl Into<String>,
    ) -> Self {
        ProgressKey {
            user_id: user_id.into(),
            course_slug: course_slug.into(),
            lesson_slug: lesson_slug.into(),
        }
    }

    /// Key under which the player SDK caches this record locally.
    pub fn cache_key(&self) -> String {
        format!(
            "lib:prog:{}:{}:{}",
            self.user_id, self.course_slug, self.lesson_slug
        )
    }
}

/// Slugs must look like path segments: non-empty, limited to the unreserved
/// URL character set.
pub fn is_url_safe_slug(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
}

/// One entry of the externally supplied, externally ordered lesson list. The
/// core consumes only the ordering and `is_locked`; the rest is display data
/// the platform passes through to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: String,
    pub title: String,
    pub duration_secs: u32,
    pub is_locked: bool,
    pub is_completed: bool,
}
