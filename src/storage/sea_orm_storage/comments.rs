//! 评论存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::comments::{ActiveModel, Column, Entity as Comments};
use crate::entity::topics::{self, Entity as Topics};
use crate::errors::{CourseHubError, Result};
use crate::models::forums::{entities::Comment, requests::NewComment};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 主题下全部有效评论，按 id 升序
    pub async fn list_topic_comments_impl(&self, topic_id: i64) -> Result<Vec<Comment>> {
        let items = Comments::find()
            .filter(Column::TopicId.eq(topic_id))
            .filter(Column::Active.eq(true))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询评论列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_comment()).collect())
    }

    pub async fn get_comment_by_id_impl(&self, id: i64) -> Result<Option<Comment>> {
        let result = Comments::find_by_id(id)
            .filter(Column::Active.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询评论失败: {e}")))?;

        Ok(result.map(|m| m.into_comment()))
    }

    /// 写入评论并刷新主题活跃时间
    pub async fn create_comment_impl(&self, comment: NewComment) -> Result<Comment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("开启事务失败: {e}")))?;
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(comment.user_id),
            forum_id: Set(comment.forum_id),
            topic_id: Set(Some(comment.topic_id)),
            parent_id: Set(comment.parent_id),
            content: Set(comment.content),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let result = model
            .insert(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建评论失败: {e}")))?;

        Topics::update_many()
            .col_expr(topics::Column::LastActivity, Expr::value(now))
            .filter(topics::Column::Id.eq(comment.topic_id))
            .exec(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新主题活跃时间失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_comment())
    }

    pub async fn update_comment_impl(&self, id: i64, content: String) -> Result<Option<Comment>> {
        let Some(existing) = Comments::find_by_id(id)
            .filter(Column::Active.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询评论失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.content = Set(content);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新评论失败: {e}")))?;

        Ok(Some(result.into_comment()))
    }

    /// 删除评论及其全部回复
    pub async fn delete_comment_impl(&self, id: i64) -> Result<bool> {
        let Some(target) = Comments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询评论失败: {e}")))?
        else {
            return Ok(false);
        };

        let siblings: Vec<(i64, Option<i64>)> = Comments::find()
            .select_only()
            .column(Column::Id)
            .column(Column::ParentId)
            .filter(Column::TopicId.eq(target.topic_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询评论失败: {e}")))?;

        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
        for (child, parent) in siblings {
            if let Some(parent) = parent {
                children.entry(parent).or_default().push(child);
            }
        }

        let mut subtree = vec![target.id];
        let mut cursor = 0;
        while cursor < subtree.len() {
            if let Some(kids) = children.get(&subtree[cursor]) {
                subtree.extend(kids.iter().copied());
            }
            cursor += 1;
        }

        let result = Comments::delete_many()
            .filter(Column::Id.is_in(subtree))
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除评论失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_course, seed_user};
    use super::*;
    use crate::models::{
        forums::requests::{CreateForumRequest, CreateTopicRequest},
        users::entities::UserRole,
    };

    async fn seed_topic(storage: &SeaOrmStorage) -> (i64, i64, i64) {
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
        let topic = storage
            .create_topic_impl(
                teacher.id,
                CreateTopicRequest {
                    forum_id: forum.id,
                    title: "Welcome".to_string(),
                    content: "Say hi".to_string(),
                },
            )
            .await
            .unwrap();
        (teacher.id, forum.id, topic.id)
    }

    fn reply(user_id: i64, forum_id: i64, topic_id: i64, parent_id: Option<i64>) -> NewComment {
        NewComment {
            user_id,
            forum_id,
            topic_id,
            parent_id,
            content: "hi".to_string(),
        }
    }

    #[tokio::test]
    async fn test_delete_removes_replies() {
        let storage = memory_storage().await;
        let (user_id, forum_id, topic_id) = seed_topic(&storage).await;

        let root = storage
            .create_comment_impl(reply(user_id, forum_id, topic_id, None))
            .await
            .unwrap();
        let child = storage
            .create_comment_impl(reply(user_id, forum_id, topic_id, Some(root.id)))
            .await
            .unwrap();
        storage
            .create_comment_impl(reply(user_id, forum_id, topic_id, Some(child.id)))
            .await
            .unwrap();
        let other = storage
            .create_comment_impl(reply(user_id, forum_id, topic_id, None))
            .await
            .unwrap();

        assert_eq!(storage.list_topic_comments_impl(topic_id).await.unwrap().len(), 4);
        assert!(storage.delete_comment_impl(root.id).await.unwrap());

        let left = storage.list_topic_comments_impl(topic_id).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, other.id);
        assert!(!storage.delete_comment_impl(root.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_comment() {
        let storage = memory_storage().await;
        let (user_id, forum_id, topic_id) = seed_topic(&storage).await;
        let created = storage
            .create_comment_impl(reply(user_id, forum_id, topic_id, None))
            .await
            .unwrap();

        let updated = storage
            .update_comment_impl(created.id, "edited".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.content, "edited");
        assert!(storage
            .update_comment_impl(9999, "x".to_string())
            .await
            .unwrap()
            .is_none());
    }
}
