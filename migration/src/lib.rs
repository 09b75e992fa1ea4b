pub use sea_orm_migration::prelude::*;

mod m20260810_120000_create_lesson_progress_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20260810_120000_create_lesson_progress_table::Migration,
        )]
    }
}
