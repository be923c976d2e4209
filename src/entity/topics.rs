//! 主题帖实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "topics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub forum_id: i64,
    pub user_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub view_count: i64,
    pub last_activity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::forums::Entity",
        from = "Column::ForumId",
        to = "super::forums::Column::Id",
        on_delete = "Cascade"
    )]
    Forum,
    #[sea_orm(has_many = "super::comments::Entity")]
    Comments,
}

impl Related<super::forums::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Forum.def()
    }
}

impl Related<super::comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_topic(self) -> crate::models::forums::entities::Topic {
        crate::models::forums::entities::Topic {
            id: self.id,
            forum_id: self.forum_id,
            user_id: self.user_id,
            title: self.title,
            content: self.content,
            is_pinned: self.is_pinned,
            is_locked: self.is_locked,
            view_count: self.view_count,
            last_activity: super::to_datetime(self.last_activity),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
