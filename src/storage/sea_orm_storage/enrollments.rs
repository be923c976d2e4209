//! 选课存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::course_progress::{self, Entity as CourseProgresses};
use crate::entity::courses::{self, Entity as Courses};
use crate::entity::user_courses::{ActiveModel, Column, Entity as UserCourses};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        responses::{EnrolledCourse, EnrollmentListResponse},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};

impl SeaOrmStorage {
    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = UserCourses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn get_enrollment_impl(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = UserCourses::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn create_enrollment_impl(
        &self,
        user_id: i64,
        course_id: i64,
        status: EnrollmentStatus,
    ) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(user_id),
            course_id: Set(course_id),
            status: Set(status.to_string()),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            // (user_id, course_id) 唯一索引冲突
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                CourseHubError::conflict("该课程已存在选课记录")
            } else {
                CourseHubError::database_operation(format!("创建选课记录失败: {e}"))
            }
        })?;

        Ok(result.into_enrollment())
    }

    pub async fn update_enrollment_status_impl(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        let result = UserCourses::update_many()
            .col_expr(Column::Status, sea_orm::sea_query::Expr::value(status.to_string()))
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新选课状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_enrollment_by_id_impl(id).await
    }

    pub async fn list_enrollments_with_pagination_impl(
        &self,
        user_id: Option<i64>,
        page: u64,
        size: u64,
    ) -> Result<EnrollmentListResponse> {
        let page = page.max(1);
        let size = size.clamp(1, 100);

        let mut select = UserCourses::find();
        if let Some(user_id) = user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }
        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            CourseHubError::database_operation(format!("查询选课记录总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            CourseHubError::database_operation(format!("查询选课记录页数失败: {e}"))
        })?;
        let items = paginator.fetch_page(page - 1).await.map_err(|e| {
            CourseHubError::database_operation(format!("查询选课记录列表失败: {e}"))
        })?;

        Ok(EnrollmentListResponse {
            items: items.into_iter().map(|m| m.into_enrollment()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 学习中的课程及其进度
    pub async fn list_enrolled_courses_impl(&self, user_id: i64) -> Result<Vec<EnrolledCourse>> {
        let rows = UserCourses::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Status.eq(EnrollmentStatus::IN_PROGRESS))
            .filter(Column::Active.eq(true))
            .find_also_related(Courses)
            .filter(courses::Column::Active.eq(true))
            .order_by_desc(Column::UpdatedAt)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询已选课程失败: {e}")))?;

        let mut progress: HashMap<i64, _> = CourseProgresses::find()
            .filter(course_progress::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程进度失败: {e}")))?
            .into_iter()
            .map(|m| (m.course_id, m.into_course_progress()))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, course)| {
                course.map(|course| EnrolledCourse {
                    progress: progress.remove(&course.id),
                    course: course.into_course(),
                    enrollment: enrollment.into_enrollment(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_course, seed_user};
    use super::*;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_unique_enrollment_per_course() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let student = seed_user(&storage, "student01", UserRole::Student).await;
        let course = seed_course(&storage, teacher.id, Some(100_000)).await;

        storage
            .create_enrollment_impl(student.id, course.id, EnrollmentStatus::Pending)
            .await
            .unwrap();
        let err = storage
            .create_enrollment_impl(student.id, course.id, EnrollmentStatus::Pending)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E016");
    }

    #[tokio::test]
    async fn test_enrolled_courses_only_in_progress() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let student = seed_user(&storage, "student01", UserRole::Student).await;
        let active = seed_course(&storage, teacher.id, None).await;
        let pending = seed_course(&storage, teacher.id, Some(10)).await;

        storage
            .create_enrollment_impl(student.id, active.id, EnrollmentStatus::InProgress)
            .await
            .unwrap();
        storage
            .create_enrollment_impl(student.id, pending.id, EnrollmentStatus::Pending)
            .await
            .unwrap();

        let courses = storage.list_enrolled_courses_impl(student.id).await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].course.id, active.id);
        assert!(courses[0].progress.is_none());

        let mine = storage
            .list_enrollments_with_pagination_impl(Some(student.id), 1, 10)
            .await
            .unwrap();
        assert_eq!(mine.pagination.total, 2);
    }
}
