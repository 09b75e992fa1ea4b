// Persistence port for lesson progress; adapters live in the sibling files.

use crate::domain::models::{ProgressKey, ProgressRecord};

pub mod db;
pub mod memory;

pub use db::DbProgressRepo;
pub use memory::MemoryProgressRepo;

#[async_trait::async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Look up the record for one key. A miss is `Ok(None)`, not an error.
    async fn get(&self, key: &ProgressKey) -> anyhow::Result<Option<ProgressRecord>>;

    /// Overwrite the record for one key, creating it on first write. Echoes
    /// the record as stored.
    async fn put(&self, key: &ProgressKey, record: ProgressRecord)
        -> anyhow::Result<ProgressRecord>;
}
