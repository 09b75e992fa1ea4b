use poem_openapi::payload::PlainText;

use crate::domain::models::ProgressKey;
use crate::storage::ProgressRepository;

pub struct HealthService<'a> {
    pub repo: &'a dyn ProgressRepository,
}

impl<'a> HealthService<'a> {
    pub fn new(repo: &'a dyn ProgressRepository) -> Self {
        Self { repo }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn status_text(&self) -> PlainText<String> {
        // A throwaway read exercises the storage path end to end.
        let probe = ProgressKey::new("health-probe", "health", "health");
        let storage = match self.repo.get(&probe).await {
            Ok(_) => "ok",
            Err(e) => {
                tracing::warn!(error = %e, "storage probe failed");
                "degraded"
            }
        };
        PlainText(format!(
            "{} version={} storage={}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            storage
        ))
    }
}
