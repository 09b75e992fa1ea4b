use std::sync::Arc;

use poem_openapi::{
    OpenApi,
    param::Query,
    payload::{Json, PlainText},
};

use super::models::{ProgressGetResponseDto, ProgressPostResponseDto, ProgressUpsertDto};
use super::services::{health::HealthService, progress::ProgressService};
use crate::config::Config;
use crate::storage::ProgressRepository;

pub struct ProgressApi {
    pub repo: Arc<dyn ProgressRepository>,
    pub config: Arc<Config>,
}

#[OpenApi]
impl ProgressApi {
    /// Liveness line with storage status
    #[oai(path = "/health", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn health(&self) -> PlainText<String> {
        HealthService::new(self.repo.as_ref()).status_text().await
    }

    /// Progress for one lesson; never-watched lessons read as zero progress
    #[oai(path = "/progress", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, course, lesson, user_id))]
    async fn get_progress(
        &self,
        /// Course slug
        Query(course): Query<Option<String>>,
        /// Lesson slug
        Query(lesson): Query<Option<String>>,
        /// Viewer identity; falls back to the configured placeholder
        #[oai(name = "userId")] user_id: Query<Option<String>>,
    ) -> ProgressGetResponseDto {
        let user_id = user_id
            .0
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| self.config.default_user_id.clone());
        tracing::debug!(user_id = %user_id, course = course.as_deref().unwrap_or(""), lesson = lesson.as_deref().unwrap_or(""), "handling get_progress");

        ProgressService::new(self.repo.as_ref())
            .fetch(&user_id, course.as_deref(), lesson.as_deref())
            .await
    }

    /// Overwrite progress for one lesson, creating it on first write
    #[oai(path = "/progress", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn post_progress(&self, body: Json<ProgressUpsertDto>) -> ProgressPostResponseDto {
        ProgressService::new(self.repo.as_ref()).store(body.0).await
    }
}
