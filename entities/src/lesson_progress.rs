use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One viewer's progress on one lesson. Rows are addressed by the unique
/// `(user_id, course_slug, lesson_slug)` index; the uuid id only exists so the
/// table has a stable primary key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lesson_progress")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub course_slug: String,
    pub lesson_slug: String,
    pub watched_pct: i16,
    pub completed: bool,
    pub completed_at: Option<DateTimeUtc>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
