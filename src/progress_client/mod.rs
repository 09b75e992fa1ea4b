// Player-side SDK: keeps lesson progress locally and syncs it best-effort.

pub mod cache;
pub mod controller;
pub mod sampler;

pub use cache::ProgressCache;
pub use controller::{ProgressController, SyncPolicy};
pub use sampler::WatchSampler;

use std::time::Duration;

use serde::Serialize;

use crate::domain::models::{ProgressKey, ProgressRecord};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Seam between the controller and the wire, so tests can drive the
/// controller with an in-process fake.
#[async_trait::async_trait]
pub trait ProgressTransport: Send + Sync {
    async fn fetch(&self, key: &ProgressKey) -> anyhow::Result<ProgressRecord>;
    async fn push(&self, key: &ProgressKey, record: &ProgressRecord) -> anyhow::Result<()>;
}

#[derive(Clone, Debug)]
pub struct ProgressApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ProgressApiClient {
    /// Create a new client against the progress service (e.g. "http://localhost:3000").
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url_str = base_url.into();
        tracing::debug!(base_url = %base_url_str, "creating ProgressApiClient");
        Ok(ProgressApiClient {
            base_url: base_url_str.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// POST body: the record plus its identity, in the service's field names.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpsertBody<'a> {
    user_id: &'a str,
    course_slug: &'a str,
    lesson_slug: &'a str,
    #[serde(flatten)]
    record: &'a ProgressRecord,
}

#[async_trait::async_trait]
impl ProgressTransport for ProgressApiClient {
    /// GET /progress
    #[tracing::instrument(level = "debug", skip(self, key))]
    async fn fetch(&self, key: &ProgressKey) -> anyhow::Result<ProgressRecord> {
        let url = self.url("/progress");
        tracing::debug!(%url, course = %key.course_slug, lesson = %key.lesson_slug, "GET progress");
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("course", key.course_slug.as_str()),
                ("lesson", key.lesson_slug.as_str()),
                ("userId", key.user_id.as_str()),
            ])
            .send()
            .await?;
        let status = resp.error_for_status()?;
        let body = status.text().await?;
        let parsed: ProgressRecord = serde_json::from_str(&body)?;
        Ok(parsed)
    }

    /// POST /progress. The response echo is deliberately dropped: adopting a
    /// slow echo could roll back a newer optimistic value.
    #[tracing::instrument(level = "debug", skip(self, key, record))]
    async fn push(&self, key: &ProgressKey, record: &ProgressRecord) -> anyhow::Result<()> {
        let url = self.url("/progress");
        tracing::debug!(%url, course = %key.course_slug, lesson = %key.lesson_slug, watched_pct = record.watched_pct, "POST progress");
        let body = UpsertBody {
            user_id: &key.user_id,
            course_slug: &key.course_slug,
            lesson_slug: &key.lesson_slug,
            record,
        };
        let resp = self.client.post(&url).json(&body).send().await?;
        resp.error_for_status()?;
        Ok(())
    }
}
