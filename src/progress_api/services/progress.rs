use chrono::Utc;
use poem_openapi::payload::Json;

use crate::{
    domain::models::{MAX_WATCHED_PCT, ProgressKey, ProgressRecord, is_url_safe_slug},
    progress_api::models::{
        ErrorDto, ProgressGetResponseDto, ProgressPostResponseDto, ProgressUpsertDto,
    },
    storage::ProgressRepository,
};

pub struct ProgressService<'a> {
    pub repo: &'a dyn ProgressRepository,
}

impl<'a> ProgressService<'a> {
    pub fn new(repo: &'a dyn ProgressRepository) -> Self {
        Self { repo }
    }

    #[tracing::instrument(level = "debug", skip(self, user_id, course, lesson))]
    pub async fn fetch(
        &self,
        user_id: &str,
        course: Option<&str>,
        lesson: Option<&str>,
    ) -> ProgressGetResponseDto {
        let (Some(course), Some(lesson)) = (non_empty(course), non_empty(lesson)) else {
            return ProgressGetResponseDto::BadRequest(Json(ErrorDto {
                error: "Missing course or lesson parameter".into(),
            }));
        };
        if !is_url_safe_slug(course) || !is_url_safe_slug(lesson) {
            return ProgressGetResponseDto::BadRequest(Json(ErrorDto {
                error: "Invalid course or lesson parameter".into(),
            }));
        }

        let key = ProgressKey::new(user_id, course, lesson);
        match self.repo.get(&key).await {
            Ok(Some(record)) => ProgressGetResponseDto::Ok(Json(record.into())),
            // Never-watched lessons read as zero progress, not as an error.
            Ok(None) => ProgressGetResponseDto::Ok(Json(ProgressRecord::default().into())),
            Err(e) => {
                tracing::error!(error = %e, "failed to load progress");
                ProgressGetResponseDto::InternalServerError(Json(ErrorDto {
                    error: "Failed to load progress".into(),
                }))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self, body))]
    pub async fn store(&self, body: ProgressUpsertDto) -> ProgressPostResponseDto {
        let (Some(user_id), Some(course), Some(lesson)) = (
            non_empty(body.user_id.as_deref()),
            non_empty(body.course_slug.as_deref()),
            non_empty(body.lesson_slug.as_deref()),
        ) else {
            return ProgressPostResponseDto::BadRequest(Json(ErrorDto {
                error: "Missing required fields".into(),
            }));
        };
        if !is_url_safe_slug(course) || !is_url_safe_slug(lesson) {
            return ProgressPostResponseDto::BadRequest(Json(ErrorDto {
                error: "Invalid course or lesson slug".into(),
            }));
        }

        let key = ProgressKey::new(user_id, course, lesson);
        let record = ProgressRecord {
            watched_pct: body
                .watched_pct
                .unwrap_or(0)
                .min(u16::from(MAX_WATCHED_PCT)) as u8,
            completed: body.completed.unwrap_or(false),
            completed_at: body.completed_at,
        }
        .normalized(Utc::now());

        match self.repo.put(&key, record).await {
            Ok(stored) => ProgressPostResponseDto::Ok(Json(stored.into())),
            Err(e) => {
                tracing::error!(error = %e, "failed to save progress");
                ProgressPostResponseDto::InternalServerError(Json(ErrorDto {
                    error: "Failed to save progress".into(),
                }))
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryProgressRepo;

    struct FailingRepo;

    #[async_trait::async_trait]
    impl ProgressRepository for FailingRepo {
        async fn get(&self, _key: &ProgressKey) -> anyhow::Result<Option<ProgressRecord>> {
            Err(anyhow::anyhow!("storage offline"))
        }

        async fn put(
            &self,
            _key: &ProgressKey,
            _record: ProgressRecord,
        ) -> anyhow::Result<ProgressRecord> {
            Err(anyhow::anyhow!("storage offline"))
        }
    }

    fn upsert(user: &str, course: &str, lesson: &str) -> ProgressUpsertDto {
        ProgressUpsertDto {
            user_id: Some(user.into()),
            course_slug: Some(course.into()),
            lesson_slug: Some(lesson.into()),
            watched_pct: None,
            completed: None,
            completed_at: None,
        }
    }

    fn ok_state(response: ProgressGetResponseDto) -> crate::progress_api::models::ProgressStateDto {
        match response {
            ProgressGetResponseDto::Ok(Json(state)) => state,
            _ => panic!("expected 200 response"),
        }
    }

    fn stored_state(
        response: ProgressPostResponseDto,
    ) -> crate::progress_api::models::ProgressStateDto {
        match response {
            ProgressPostResponseDto::Ok(Json(state)) => state,
            _ => panic!("expected 200 response"),
        }
    }

    #[tokio::test]
    async fn get_unknown_key_reads_as_zero_progress() {
        let repo = MemoryProgressRepo::new();
        let service = ProgressService::new(&repo);
        let state = ok_state(service.fetch("u1", Some("course"), Some("intro")).await);
        assert_eq!(state.watched_pct, 0);
        assert!(!state.completed);
        assert!(state.completed_at.is_none());
    }

    #[tokio::test]
    async fn get_without_course_or_lesson_is_rejected() {
        let repo = MemoryProgressRepo::new();
        let service = ProgressService::new(&repo);
        for (course, lesson) in [(None, Some("intro")), (Some("course"), None), (Some(""), Some("intro"))] {
            match service.fetch("u1", course, lesson).await {
                ProgressGetResponseDto::BadRequest(Json(err)) => {
                    assert_eq!(err.error, "Missing course or lesson parameter");
                }
                _ => panic!("expected 400 response"),
            }
        }
    }

    #[tokio::test]
    async fn get_with_malformed_slug_is_rejected() {
        let repo = MemoryProgressRepo::new();
        let service = ProgressService::new(&repo);
        match service.fetch("u1", Some("has space"), Some("intro")).await {
            ProgressGetResponseDto::BadRequest(Json(err)) => {
                assert_eq!(err.error, "Invalid course or lesson parameter");
            }
            _ => panic!("expected 400 response"),
        }
    }

    #[tokio::test]
    async fn post_then_get_round_trips() {
        let repo = MemoryProgressRepo::new();
        let service = ProgressService::new(&repo);
        let mut body = upsert("u1", "course", "intro");
        body.watched_pct = Some(80);
        service.store(body).await;

        let state = ok_state(service.fetch("u1", Some("course"), Some("intro")).await);
        assert_eq!(state.watched_pct, 80);
        assert!(!state.completed);
    }

    #[tokio::test]
    async fn post_without_identity_fields_is_rejected() {
        let repo = MemoryProgressRepo::new();
        let service = ProgressService::new(&repo);
        for body in [
            ProgressUpsertDto {
                user_id: None,
                ..upsert("u1", "course", "intro")
            },
            ProgressUpsertDto {
                course_slug: Some("  ".into()),
                ..upsert("u1", "course", "intro")
            },
            ProgressUpsertDto {
                lesson_slug: None,
                ..upsert("u1", "course", "intro")
            },
        ] {
            match service.store(body).await {
                ProgressPostResponseDto::BadRequest(Json(err)) => {
                    assert_eq!(err.error, "Missing required fields");
                }
                _ => panic!("expected 400 response"),
            }
        }
    }

    #[tokio::test]
    async fn post_with_malformed_slug_is_rejected() {
        let repo = MemoryProgressRepo::new();
        let service = ProgressService::new(&repo);
        match service.store(upsert("u1", "course", "bad/lesson")).await {
            ProgressPostResponseDto::BadRequest(Json(err)) => {
                assert_eq!(err.error, "Invalid course or lesson slug");
            }
            _ => panic!("expected 400 response"),
        }
    }

    #[tokio::test]
    async fn post_defaults_absent_progress_fields() {
        let repo = MemoryProgressRepo::new();
        let service = ProgressService::new(&repo);
        let state = stored_state(service.store(upsert("u1", "course", "intro")).await);
        assert_eq!(state.watched_pct, 0);
        assert!(!state.completed);
        assert!(state.completed_at.is_none());
    }

    #[tokio::test]
    async fn post_clamps_watched_pct_above_limit() {
        let repo = MemoryProgressRepo::new();
        let service = ProgressService::new(&repo);
        let mut body = upsert("u1", "course", "intro");
        body.watched_pct = Some(300);
        let state = stored_state(service.store(body).await);
        assert_eq!(state.watched_pct, 100);
    }

    #[tokio::test]
    async fn completing_without_timestamp_stamps_one() {
        let repo = MemoryProgressRepo::new();
        let service = ProgressService::new(&repo);
        let mut body = upsert("u1", "course", "intro");
        body.completed = Some(true);
        let state = stored_state(service.store(body).await);
        assert!(state.completed);
        assert!(state.completed_at.is_some());
    }

    #[tokio::test]
    async fn completing_keeps_a_supplied_timestamp() {
        let repo = MemoryProgressRepo::new();
        let service = ProgressService::new(&repo);
        let supplied = "2026-08-01T08:00:00Z".parse().unwrap();
        let mut body = upsert("u1", "course", "intro");
        body.completed = Some(true);
        body.completed_at = Some(supplied);
        let state = stored_state(service.store(body).await);
        assert_eq!(state.completed_at, Some(supplied));
    }

    #[tokio::test]
    async fn undoing_completion_clears_the_timestamp() {
        let repo = MemoryProgressRepo::new();
        let service = ProgressService::new(&repo);
        let mut done = upsert("u1", "course", "intro");
        done.completed = Some(true);
        service.store(done).await;

        let mut undone = upsert("u1", "course", "intro");
        undone.completed = Some(false);
        undone.completed_at = Some(Utc::now());
        let state = stored_state(service.store(undone).await);
        assert!(!state.completed);
        assert!(state.completed_at.is_none());
    }

    #[tokio::test]
    async fn posts_overwrite_rather_than_merge() {
        let repo = MemoryProgressRepo::new();
        let service = ProgressService::new(&repo);
        let mut first = upsert("u1", "course", "intro");
        first.watched_pct = Some(80);
        service.store(first).await;

        let mut second = upsert("u1", "course", "intro");
        second.watched_pct = Some(20);
        service.store(second).await;

        let state = ok_state(service.fetch("u1", Some("course"), Some("intro")).await);
        assert_eq!(state.watched_pct, 20);
    }

    #[tokio::test]
    async fn progress_is_isolated_per_user_and_lesson() {
        let repo = MemoryProgressRepo::new();
        let service = ProgressService::new(&repo);
        let mut body = upsert("u1", "course", "intro");
        body.watched_pct = Some(55);
        service.store(body).await;

        let other_user = ok_state(service.fetch("u2", Some("course"), Some("intro")).await);
        assert_eq!(other_user.watched_pct, 0);
        let other_lesson = ok_state(service.fetch("u1", Some("course"), Some("pitch")).await);
        assert_eq!(other_lesson.watched_pct, 0);
    }

    #[tokio::test]
    async fn get_surfaces_storage_failure_as_500() {
        let repo = FailingRepo;
        let service = ProgressService::new(&repo);
        match service.fetch("u1", Some("course"), Some("intro")).await {
            ProgressGetResponseDto::InternalServerError(Json(err)) => {
                assert_eq!(err.error, "Failed to load progress");
            }
            _ => panic!("expected 500 response"),
        }
    }

    #[tokio::test]
    async fn post_surfaces_storage_failure_as_500() {
        let repo = FailingRepo;
        let service = ProgressService::new(&repo);
        match service.store(upsert("u1", "course", "intro")).await {
            ProgressPostResponseDto::InternalServerError(Json(err)) => {
                assert_eq!(err.error, "Failed to save progress");
            }
            _ => panic!("expected 500 response"),
        }
    }
}
