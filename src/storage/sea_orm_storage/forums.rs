//! 论坛存储操作

use super::SeaOrmStorage;
use crate::entity::forums::{ActiveModel, Column, Entity as Forums};
use crate::entity::user_courses::{self, Entity as UserCourses};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    enrollments::entities::EnrollmentStatus,
    forums::{entities::Forum, requests::CreateForumRequest, responses::ForumListResponse},
};
use crate::storage::ForumScope;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};

impl SeaOrmStorage {
    pub async fn list_forums_with_pagination_impl(
        &self,
        scope: ForumScope,
        page: u64,
        size: u64,
    ) -> Result<ForumListResponse> {
        let page = page.max(1);
        let size = size.clamp(1, 100);

        let mut select = Forums::find().filter(Column::Active.eq(true));
        match scope {
            ForumScope::All => {}
            ForumScope::CreatedBy(user_id) => {
                select = select.filter(Column::UserId.eq(user_id));
            }
            ForumScope::EnrolledBy(user_id) => {
                let course_ids: Vec<i64> = UserCourses::find()
                    .select_only()
                    .column(user_courses::Column::CourseId)
                    .filter(user_courses::Column::UserId.eq(user_id))
                    .filter(user_courses::Column::Active.eq(true))
                    .filter(user_courses::Column::Status.is_in([
                        EnrollmentStatus::IN_PROGRESS,
                        EnrollmentStatus::COMPLETE,
                    ]))
                    .into_tuple()
                    .all(&self.db)
                    .await
                    .map_err(|e| {
                        CourseHubError::database_operation(format!("查询选课记录失败: {e}"))
                    })?;
                select = select.filter(Column::CourseId.is_in(course_ids));
            }
        }
        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询论坛总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询论坛页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询论坛列表失败: {e}")))?;

        Ok(ForumListResponse {
            items: items.into_iter().map(|m| m.into_forum()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn get_forum_by_id_impl(&self, id: i64) -> Result<Option<Forum>> {
        let result = Forums::find_by_id(id)
            .filter(Column::Active.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询论坛失败: {e}")))?;

        Ok(result.map(|m| m.into_forum()))
    }

    pub async fn get_forum_by_course_id_impl(&self, course_id: i64) -> Result<Option<Forum>> {
        let result = Forums::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Active.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程论坛失败: {e}")))?;

        Ok(result.map(|m| m.into_forum()))
    }

    /// 每门课程最多一个论坛
    pub async fn create_forum_impl(&self, user_id: i64, req: CreateForumRequest) -> Result<Forum> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(user_id),
            course_id: Set(Some(req.course_id)),
            name: Set(req.name),
            description: Set(req.description),
            is_locked: Set(false),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                CourseHubError::conflict("该课程已有论坛")
            } else {
                CourseHubError::database_operation(format!("创建论坛失败: {e}"))
            }
        })?;

        Ok(result.into_forum())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_course, seed_user};
    use super::*;
    use crate::models::users::entities::UserRole;

    fn forum_request(course_id: i64) -> CreateForumRequest {
        CreateForumRequest {
            course_id,
            name: "Q&A".to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_one_forum_per_course() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let course = seed_course(&storage, teacher.id, None).await;

        let forum = storage
            .create_forum_impl(teacher.id, forum_request(course.id))
            .await
            .unwrap();
        assert_eq!(forum.course_id, Some(course.id));

        let err = storage
            .create_forum_impl(teacher.id, forum_request(course.id))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E016");

        let found = storage
            .get_forum_by_course_id_impl(course.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, forum.id);
    }

    #[tokio::test]
    async fn test_list_scopes() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let other = seed_user(&storage, "teacher02", UserRole::Teacher).await;
        let student = seed_user(&storage, "student01", UserRole::Student).await;
        let course_a = seed_course(&storage, teacher.id, None).await;
        let course_b = seed_course(&storage, other.id, Some(10)).await;

        storage
            .create_forum_impl(teacher.id, forum_request(course_a.id))
            .await
            .unwrap();
        storage
            .create_forum_impl(other.id, forum_request(course_b.id))
            .await
            .unwrap();
        storage
            .create_enrollment_impl(student.id, course_a.id, EnrollmentStatus::InProgress)
            .await
            .unwrap();
        storage
            .create_enrollment_impl(student.id, course_b.id, EnrollmentStatus::Pending)
            .await
            .unwrap();

        let all = storage
            .list_forums_with_pagination_impl(ForumScope::All, 1, 10)
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);

        let created = storage
            .list_forums_with_pagination_impl(ForumScope::CreatedBy(other.id), 1, 10)
            .await
            .unwrap();
        assert_eq!(created.items.len(), 1);
        assert_eq!(created.items[0].course_id, Some(course_b.id));

        let enrolled = storage
            .list_forums_with_pagination_impl(ForumScope::EnrolledBy(student.id), 1, 10)
            .await
            .unwrap();
        assert_eq!(enrolled.items.len(), 1);
        assert_eq!(enrolled.items[0].course_id, Some(course_a.id));
    }
}
