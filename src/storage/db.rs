// sea-orm adapter backed by the lesson_progress table. Writes are single-row
// upserts keyed on the unique (user, course, lesson) index.

use chrono::Utc;
use entities::lesson_progress;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::domain::models::{MAX_WATCHED_PCT, ProgressKey, ProgressRecord};
use crate::storage::ProgressRepository;

pub struct DbProgressRepo {
    db: DatabaseConnection,
}

impl DbProgressRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        DbProgressRepo { db }
    }
}

fn to_record(model: lesson_progress::Model) -> ProgressRecord {
    ProgressRecord {
        // The column is a small integer; anything outside 0..=100 could only
        // come from out-of-band writes, so fold it back into range here.
        watched_pct: model.watched_pct.clamp(0, MAX_WATCHED_PCT as i16) as u8,
        completed: model.completed,
        completed_at: model.completed_at,
    }
}

#[async_trait::async_trait]
impl ProgressRepository for DbProgressRepo {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get(&self, key: &ProgressKey) -> anyhow::Result<Option<ProgressRecord>> {
        let found = lesson_progress::Entity::find()
            .filter(lesson_progress::Column::UserId.eq(&key.user_id))
            .filter(lesson_progress::Column::CourseSlug.eq(&key.course_slug))
            .filter(lesson_progress::Column::LessonSlug.eq(&key.lesson_slug))
            .one(&self.db)
            .await?;
        Ok(found.map(to_record))
    }

    #[tracing::instrument(level = "debug", skip(self, record))]
    async fn put(
        &self,
        key: &ProgressKey,
        record: ProgressRecord,
    ) -> anyhow::Result<ProgressRecord> {
        let row = lesson_progress::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(key.user_id.clone()),
            course_slug: Set(key.course_slug.clone()),
            lesson_slug: Set(key.lesson_slug.clone()),
            watched_pct: Set(record.watched_pct as i16),
            completed: Set(record.completed),
            completed_at: Set(record.completed_at),
            updated_at: Set(Utc::now()),
        };

        lesson_progress::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    lesson_progress::Column::UserId,
                    lesson_progress::Column::CourseSlug,
                    lesson_progress::Column::LessonSlug,
                ])
                .update_columns([
                    lesson_progress::Column::WatchedPct,
                    lesson_progress::Column::Completed,
                    lesson_progress::Column::CompletedAt,
                    lesson_progress::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(record)
    }
}
