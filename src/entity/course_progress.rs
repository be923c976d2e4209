//! 课程进度实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub total_lessons: i64,
    pub completed_lessons: i64,
    pub total_watch_time: i64,
    pub completion_percentage: f64,
    pub last_accessed_at: i64,
    pub enrolled_at: i64,
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
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_course_progress(self) -> crate::models::progress::entities::CourseProgress {
        crate::models::progress::entities::CourseProgress {
            id: self.id,
            user_id: self.user_id,
            course_id: self.course_id,
            total_lessons: self.total_lessons,
            completed_lessons: self.completed_lessons,
            total_watch_time: self.total_watch_time,
            completion_percentage: self.completion_percentage,
            last_accessed_at: Some(super::to_datetime(self.last_accessed_at)),
            enrolled_at: super::to_datetime(self.enrolled_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
