use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LessonProgress::Table)
                    .if_not_exists()
                    .col(uuid(LessonProgress::Id).primary_key())
                    .col(string(LessonProgress::UserId))
                    .col(string(LessonProgress::CourseSlug))
                    .col(string(LessonProgress::LessonSlug))
                    .col(small_integer(LessonProgress::WatchedPct))
                    .col(boolean(LessonProgress::Completed))
                    .col(timestamp_with_time_zone_null(LessonProgress::CompletedAt))
                    .col(timestamp_with_time_zone(LessonProgress::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Upserts key on the composite identity, so it must be unique.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lesson_progress_key")
                    .table(LessonProgress::Table)
                    .col(LessonProgress::UserId)
                    .col(LessonProgress::CourseSlug)
                    .col(LessonProgress::LessonSlug)
                    .unique()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LessonProgress::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum LessonProgress {
    Table,
    Id,
    UserId,
    CourseSlug,
    LessonSlug,
    WatchedPct,
    Completed,
    CompletedAt,
    UpdatedAt,
}
