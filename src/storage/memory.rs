// In-memory adapter: the zero-setup store used by tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::anyhow;

use crate::domain::models::{ProgressKey, ProgressRecord};
use crate::storage::ProgressRepository;

#[derive(Debug, Default)]
pub struct MemoryProgressRepo {
    records: RwLock<HashMap<ProgressKey, ProgressRecord>>,
}

impl MemoryProgressRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProgressRepository for MemoryProgressRepo {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get(&self, key: &ProgressKey) -> anyhow::Result<Option<ProgressRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| anyhow!("progress map lock poisoned"))?;
        Ok(records.get(key).cloned())
    }

    #[tracing::instrument(level = "debug", skip(self, record))]
    async fn put(
        &self,
        key: &ProgressKey,
        record: ProgressRecord,
    ) -> anyhow::Result<ProgressRecord> {
        let mut records = self
            .records
            .write()
            .map_err(|_| anyhow!("progress map lock poisoned"))?;
        records.insert(key.clone(), record.clone());
        Ok(record)
    }
}
