//! 主题帖存储操作

use super::SeaOrmStorage;
use crate::entity::topics::{ActiveModel, Column, Entity as Topics};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    forums::{
        entities::Topic,
        requests::{CreateTopicRequest, UpdateTopicRequest},
        responses::TopicListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 置顶优先，其余按最后活跃时间倒序
    pub async fn list_topics_with_pagination_impl(
        &self,
        forum_id: Option<i64>,
        page: u64,
        size: u64,
    ) -> Result<TopicListResponse> {
        let page = page.max(1);
        let size = size.clamp(1, 100);

        let mut select = Topics::find();
        if let Some(forum_id) = forum_id {
            select = select.filter(Column::ForumId.eq(forum_id));
        }
        select = select
            .order_by_desc(Column::IsPinned)
            .order_by_desc(Column::LastActivity)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询主题总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询主题页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询主题列表失败: {e}")))?;

        Ok(TopicListResponse {
            items: items.into_iter().map(|m| m.into_topic()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn get_topic_by_id_impl(&self, id: i64) -> Result<Option<Topic>> {
        let result = Topics::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询主题失败: {e}")))?;

        Ok(result.map(|m| m.into_topic()))
    }

    pub async fn create_topic_impl(&self, user_id: i64, req: CreateTopicRequest) -> Result<Topic> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            forum_id: Set(req.forum_id),
            user_id: Set(user_id),
            title: Set(req.title),
            content: Set(req.content),
            is_pinned: Set(false),
            is_locked: Set(false),
            view_count: Set(0),
            last_activity: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建主题失败: {e}")))?;

        Ok(result.into_topic())
    }

    pub async fn update_topic_impl(&self, id: i64, req: UpdateTopicRequest) -> Result<Option<Topic>> {
        let Some(existing) = Topics::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询主题失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        // 只有标题或正文变化才算活跃
        let touched = req.title.is_some() || req.content.is_some();

        let mut model: ActiveModel = existing.into();
        if let Some(title) = req.title {
            model.title = Set(title);
        }
        if let Some(content) = req.content {
            model.content = Set(content);
        }
        if let Some(is_pinned) = req.is_pinned {
            model.is_pinned = Set(is_pinned);
        }
        if let Some(is_locked) = req.is_locked {
            model.is_locked = Set(is_locked);
        }
        if touched {
            model.last_activity = Set(now);
        }
        model.updated_at = Set(now);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新主题失败: {e}")))?;

        Ok(Some(result.into_topic()))
    }

    /// 评论随外键级联删除
    pub async fn delete_topic_impl(&self, id: i64) -> Result<bool> {
        let result = Topics::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除主题失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 浏览数原子加一，返回新值
    pub async fn increment_topic_view_impl(&self, id: i64) -> Result<Option<i64>> {
        let result = Topics::update_many()
            .col_expr(
                Column::ViewCount,
                // 不引入 ExprTrait，避免与 Ord::max 冲突
                sea_orm::ExprTrait::add(Expr::col(Column::ViewCount), 1),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新浏览数失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        Ok(self.get_topic_by_id_impl(id).await?.map(|t| t.view_count))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_course, seed_user};
    use super::*;
    use crate::models::{forums::requests::CreateForumRequest, users::entities::UserRole};

    async fn seed_forum(storage: &SeaOrmStorage) -> (i64, i64) {
        let teacher = seed_user(storage, "teacher01", UserRole::Teacher).await;
        let course = seed_course(storage, teacher.id, None).await;
        let forum = storage
            .create_forum_impl(
                teacher.id,
                CreateForumRequest {
                    course_id: course.id,
                    name: "Q&A".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        (teacher.id, forum.id)
    }

    fn topic(forum_id: i64, title: &str) -> CreateTopicRequest {
        CreateTopicRequest {
            forum_id,
            title: title.to_string(),
            content: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn test_view_count_increments() {
        let storage = memory_storage().await;
        let (user_id, forum_id) = seed_forum(&storage).await;
        let created = storage
            .create_topic_impl(user_id, topic(forum_id, "hello"))
            .await
            .unwrap();

        assert_eq!(storage.increment_topic_view_impl(created.id).await.unwrap(), Some(1));
        assert_eq!(storage.increment_topic_view_impl(created.id).await.unwrap(), Some(2));
        assert_eq!(storage.increment_topic_view_impl(9999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_pinned_topics_first() {
        let storage = memory_storage().await;
        let (user_id, forum_id) = seed_forum(&storage).await;
        let first = storage
            .create_topic_impl(user_id, topic(forum_id, "first"))
            .await
            .unwrap();
        storage
            .create_topic_impl(user_id, topic(forum_id, "second"))
            .await
            .unwrap();

        storage
            .update_topic_impl(
                first.id,
                UpdateTopicRequest {
                    is_pinned: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let list = storage
            .list_topics_with_pagination_impl(Some(forum_id), 1, 10)
            .await
            .unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].id, first.id);
        assert!(list.items[0].is_pinned);
    }

    #[tokio::test]
    async fn test_delete_topic() {
        let storage = memory_storage().await;
        let (user_id, forum_id) = seed_forum(&storage).await;
        let created = storage
            .create_topic_impl(user_id, topic(forum_id, "bye"))
            .await
            .unwrap();

        assert!(storage.delete_topic_impl(created.id).await.unwrap());
        assert!(!storage.delete_topic_impl(created.id).await.unwrap());
        assert!(storage.get_topic_by_id_impl(created.id).await.unwrap().is_none());
    }
}
