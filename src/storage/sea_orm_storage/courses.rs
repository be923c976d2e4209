//! 课程存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::chapters::{self, Entity as Chapters};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::documents::{self, Entity as Documents};
use crate::entity::lessons::{self, Entity as Lessons};
use crate::entity::user_courses::{self, Entity as UserCourses};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::{Course, CourseLevel},
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::{ChapterOutline, CourseListResponse, LessonOutline, TopCourse},
    },
    enrollments::entities::EnrollmentStatus,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 分页列出有效课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut select = Courses::find().filter(Column::Active.eq(true));

        if let Some(lecturer_id) = query.lecturer_id {
            select = select.filter(Column::LecturerId.eq(lecturer_id));
        }

        if let Some(category_id) = query.category_id {
            select = select.filter(Column::CategoryId.eq(category_id));
        }

        // 价格区间
        if let Some(min_price) = query.min_price {
            select = select.filter(Column::Price.gte(min_price));
        }

        if let Some(max_price) = query.max_price {
            select = select.filter(Column::Price.lte(max_price));
        }

        if let Some(ref level) = query.level {
            select = select.filter(Column::Level.eq(level.to_string()));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::Subject.contains(&escaped))
                    .add(Column::Description.contains(&escaped)),
            );
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程页数失败: {e}")))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 通过 ID 获取有效课程
    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .filter(Column::Active.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn create_course_impl(
        &self,
        lecturer_id: i64,
        req: CreateCourseRequest,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            category_id: Set(req.category_id),
            lecturer_id: Set(lecturer_id),
            subject: Set(req.subject),
            name: Set(req.name),
            description: Set(req.description),
            image_url: Set(req.image_url),
            thumbnail_url: Set(req.thumbnail_url),
            video_url: Set(req.video_url),
            price: Set(req.price),
            level: Set(req.level.unwrap_or(CourseLevel::Beginner).to_string()),
            duration: Set(req.duration.unwrap_or(0)),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    pub async fn update_course_impl(
        &self,
        id: i64,
        req: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(category_id) = req.category_id {
            model.category_id = Set(category_id);
        }
        if let Some(subject) = req.subject {
            model.subject = Set(subject);
        }
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }
        if let Some(image_url) = req.image_url {
            model.image_url = Set(Some(image_url));
        }
        if let Some(thumbnail_url) = req.thumbnail_url {
            model.thumbnail_url = Set(Some(thumbnail_url));
        }
        if let Some(video_url) = req.video_url {
            model.video_url = Set(Some(video_url));
        }
        if let Some(price) = req.price {
            model.price = Set(Some(price));
        }
        if let Some(level) = req.level {
            model.level = Set(level.to_string());
        }
        if let Some(duration) = req.duration {
            model.duration = Set(duration);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新课程失败: {e}")))?;

        self.get_course_by_id_impl(id).await
    }

    /// 停用课程
    pub async fn deactivate_course_impl(&self, id: i64) -> Result<bool> {
        let result = Courses::update_many()
            .col_expr(Column::Active, sea_orm::sea_query::Expr::value(false))
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .filter(Column::Active.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("停用课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 按有效选课人数排序的热门课程
    pub async fn list_top_courses_impl(&self, limit: usize) -> Result<Vec<TopCourse>> {
        let course_ids: Vec<i64> = Courses::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::Active.eq(true))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程失败: {e}")))?;

        let enrolled: Vec<i64> = UserCourses::find()
            .select_only()
            .column(user_courses::Column::CourseId)
            .filter(user_courses::Column::Active.eq(true))
            .filter(user_courses::Column::Status.is_in([
                EnrollmentStatus::IN_PROGRESS,
                EnrollmentStatus::COMPLETE,
            ]))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("统计选课人数失败: {e}")))?;

        let mut counts: HashMap<i64, i64> = HashMap::new();
        for course_id in enrolled {
            *counts.entry(course_id).or_default() += 1;
        }

        let mut ranked: Vec<(i64, i64)> = course_ids
            .into_iter()
            .map(|id| (id, counts.get(&id).copied().unwrap_or(0)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);

        let ids: Vec<i64> = ranked.iter().map(|(id, _)| *id).collect();
        let mut courses: HashMap<i64, Course> = Courses::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .map(|m| (m.id, m.into_course()))
            .collect();

        Ok(ranked
            .into_iter()
            .filter_map(|(id, enrollment_count)| {
                courses.remove(&id).map(|course| TopCourse {
                    course,
                    enrollment_count,
                })
            })
            .collect())
    }

    /// 课程大纲：有效章节、课时与资料
    pub async fn get_course_outline_impl(&self, course_id: i64) -> Result<Vec<ChapterOutline>> {
        let chapter_models = Chapters::find()
            .filter(chapters::Column::CourseId.eq(course_id))
            .filter(chapters::Column::Active.eq(true))
            .order_by_asc(chapters::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询章节失败: {e}")))?;

        let chapter_ids: Vec<i64> = chapter_models.iter().map(|c| c.id).collect();
        let lesson_models = Lessons::find()
            .filter(lessons::Column::ChapterId.is_in(chapter_ids))
            .filter(lessons::Column::Active.eq(true))
            .order_by_asc(lessons::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课时失败: {e}")))?;

        let lesson_ids: Vec<i64> = lesson_models.iter().map(|l| l.id).collect();
        let document_models = Documents::find()
            .filter(documents::Column::LessonId.is_in(lesson_ids))
            .filter(documents::Column::Active.eq(true))
            .order_by_asc(documents::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询资料失败: {e}")))?;

        let mut documents_by_lesson: HashMap<i64, Vec<_>> = HashMap::new();
        for doc in document_models {
            documents_by_lesson
                .entry(doc.lesson_id)
                .or_default()
                .push(doc.into_document());
        }

        let mut lessons_by_chapter: HashMap<i64, Vec<LessonOutline>> = HashMap::new();
        for lesson in lesson_models {
            let documents = documents_by_lesson.remove(&lesson.id).unwrap_or_default();
            lessons_by_chapter
                .entry(lesson.chapter_id)
                .or_default()
                .push(LessonOutline {
                    lesson: lesson.into_lesson(),
                    documents,
                });
        }

        Ok(chapter_models
            .into_iter()
            .map(|chapter| ChapterOutline {
                lessons: lessons_by_chapter.remove(&chapter.id).unwrap_or_default(),
                chapter: chapter.into_chapter(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_course, seed_lessons, seed_user};
    use super::*;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_list_filters_and_default_page() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let cheap = seed_course(&storage, teacher.id, Some(50_000)).await;
        let pricey = seed_course(&storage, teacher.id, Some(500_000)).await;

        let result = storage
            .list_courses_with_pagination_impl(CourseListQuery {
                page: 1,
                size: 8,
                max_price: Some(100_000),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].id, cheap.id);

        assert!(storage.deactivate_course_impl(pricey.id).await.unwrap());
        assert!(storage.get_course_by_id_impl(pricey.id).await.unwrap().is_none());
        let all = storage
            .list_courses_with_pagination_impl(CourseListQuery {
                page: 1,
                size: 8,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_top_courses_ranked_by_active_enrollments() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let a = seed_course(&storage, teacher.id, None).await;
        let b = seed_course(&storage, teacher.id, None).await;
        let s1 = seed_user(&storage, "student01", UserRole::Student).await;
        let s2 = seed_user(&storage, "student02", UserRole::Student).await;

        storage
            .create_enrollment_impl(s1.id, b.id, EnrollmentStatus::InProgress)
            .await
            .unwrap();
        storage
            .create_enrollment_impl(s2.id, b.id, EnrollmentStatus::Complete)
            .await
            .unwrap();
        storage
            .create_enrollment_impl(s1.id, a.id, EnrollmentStatus::Pending)
            .await
            .unwrap();

        let top = storage.list_top_courses_impl(3).await.unwrap();
        assert_eq!(top[0].course.id, b.id);
        assert_eq!(top[0].enrollment_count, 2);
        assert_eq!(top[1].enrollment_count, 0);
    }

    #[tokio::test]
    async fn test_outline_skips_inactive_lessons() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let course = seed_course(&storage, teacher.id, None).await;
        let lessons = seed_lessons(&storage, course.id, 3).await;
        storage.deactivate_lesson_impl(lessons[1].id).await.unwrap();

        let outline = storage.get_course_outline_impl(course.id).await.unwrap();
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].lessons.len(), 2);
    }
}
