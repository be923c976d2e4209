//! 课时进度实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lesson_progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    pub status: String,
    pub watch_time: i64,
    pub completion_percentage: f64,
    pub started_at: Option<i64>,
    pub last_watched_at: Option<i64>,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::lessons::Entity",
        from = "Column::LessonId",
        to = "super::lessons::Column::Id",
        on_delete = "Cascade"
    )]
    Lesson,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::lessons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lesson.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_lesson_progress(self) -> crate::models::progress::entities::LessonProgress {
        use crate::models::progress::entities::{LessonProgress, LessonProgressStatus};

        LessonProgress {
            id: self.id,
            user_id: self.user_id,
            lesson_id: self.lesson_id,
            status: self
                .status
                .parse::<LessonProgressStatus>()
                .unwrap_or(LessonProgressStatus::NotStarted),
            watch_time: self.watch_time,
            completion_percentage: self.completion_percentage,
            started_at: super::to_optional_datetime(self.started_at),
            last_watched_at: super::to_optional_datetime(self.last_watched_at),
            completed_at: super::to_optional_datetime(self.completed_at),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
