//! 课时与资料存储操作

use super::SeaOrmStorage;
use crate::entity::chapters::{self, Entity as Chapters};
use crate::entity::documents::{self, Entity as Documents};
use crate::entity::lessons::{ActiveModel, Column, Entity as Lessons};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    lessons::{
        entities::{Document, Lesson},
        requests::{CreateDocumentRequest, CreateLessonRequest, UpdateLessonRequest},
        responses::LessonListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

/// 未指定类型的课时按视频处理
const DEFAULT_LESSON_TYPE: &str = "video";

impl SeaOrmStorage {
    pub async fn list_lessons_with_pagination_impl(
        &self,
        chapter_id: Option<i64>,
        page: u64,
        size: u64,
    ) -> Result<LessonListResponse> {
        let page = page.max(1);
        let size = size.clamp(1, 100);

        let mut select = Lessons::find().filter(Column::Active.eq(true));
        if let Some(chapter_id) = chapter_id {
            select = select.filter(Column::ChapterId.eq(chapter_id));
        }
        select = select.order_by_asc(Column::ChapterId).order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课时总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课时页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课时列表失败: {e}")))?;

        Ok(LessonListResponse {
            items: items.into_iter().map(|m| m.into_lesson()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn get_lesson_by_id_impl(&self, id: i64) -> Result<Option<Lesson>> {
        let result = Lessons::find_by_id(id)
            .filter(Column::Active.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课时失败: {e}")))?;

        Ok(result.map(|m| m.into_lesson()))
    }

    /// 课时所属课程 ID（经由章节）
    pub async fn get_lesson_course_id_impl(&self, lesson_id: i64) -> Result<Option<i64>> {
        let result = Lessons::find_by_id(lesson_id)
            .find_also_related(Chapters)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课时章节失败: {e}")))?;

        Ok(result.and_then(|(_, chapter)| chapter.map(|c| c.course_id)))
    }

    pub async fn create_lesson_impl(&self, req: CreateLessonRequest) -> Result<Lesson> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            chapter_id: Set(req.chapter_id),
            name: Set(req.name),
            description: Set(req.description),
            lesson_type: Set(req
                .lesson_type
                .unwrap_or_else(|| DEFAULT_LESSON_TYPE.to_string())),
            video_url: Set(req.video_url),
            duration: Set(req.duration.unwrap_or(0)),
            is_published: Set(req.is_published),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建课时失败: {e}")))?;

        Ok(result.into_lesson())
    }

    pub async fn update_lesson_impl(
        &self,
        id: i64,
        req: UpdateLessonRequest,
    ) -> Result<Option<Lesson>> {
        if self.get_lesson_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }
        if let Some(lesson_type) = req.lesson_type {
            model.lesson_type = Set(lesson_type);
        }
        if let Some(video_url) = req.video_url {
            model.video_url = Set(Some(video_url));
        }
        if let Some(duration) = req.duration {
            model.duration = Set(duration);
        }
        if let Some(is_published) = req.is_published {
            model.is_published = Set(is_published);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新课时失败: {e}")))?;

        self.get_lesson_by_id_impl(id).await
    }

    pub async fn deactivate_lesson_impl(&self, id: i64) -> Result<bool> {
        let result = Lessons::update_many()
            .col_expr(Column::Active, sea_orm::sea_query::Expr::value(false))
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .filter(Column::Active.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("停用课时失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 课程下全部有效课时 ID
    pub(crate) async fn list_course_lesson_ids<C>(&self, conn: &C, course_id: i64) -> Result<Vec<i64>>
    where
        C: sea_orm::ConnectionTrait,
    {
        use sea_orm::QuerySelect;

        Lessons::find()
            .select_only()
            .column(Column::Id)
            .inner_join(Chapters)
            .filter(chapters::Column::CourseId.eq(course_id))
            .filter(chapters::Column::Active.eq(true))
            .filter(Column::Active.eq(true))
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询课程课时失败: {e}")))
    }

    pub async fn list_documents_impl(&self, lesson_id: i64) -> Result<Vec<Document>> {
        let items = Documents::find()
            .filter(documents::Column::LessonId.eq(lesson_id))
            .filter(documents::Column::Active.eq(true))
            .order_by_asc(documents::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询资料列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_document()).collect())
    }

    pub async fn create_document_impl(
        &self,
        lesson_id: i64,
        req: CreateDocumentRequest,
    ) -> Result<Document> {
        let now = chrono::Utc::now().timestamp();

        let model = documents::ActiveModel {
            lesson_id: Set(lesson_id),
            name: Set(req.name),
            file_url: Set(req.file_url),
            document_type: Set(req.document_type),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("创建资料失败: {e}")))?;

        Ok(result.into_document())
    }

    pub async fn deactivate_document_impl(&self, lesson_id: i64, document_id: i64) -> Result<bool> {
        let result = Documents::update_many()
            .col_expr(documents::Column::Active, sea_orm::sea_query::Expr::value(false))
            .col_expr(
                documents::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(documents::Column::Id.eq(document_id))
            .filter(documents::Column::LessonId.eq(lesson_id))
            .filter(documents::Column::Active.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除资料失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_course, seed_lessons, seed_user};
    use super::*;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_lesson_course_lookup() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let course = seed_course(&storage, teacher.id, None).await;
        let lessons = seed_lessons(&storage, course.id, 2).await;

        assert_eq!(
            storage.get_lesson_course_id_impl(lessons[0].id).await.unwrap(),
            Some(course.id)
        );
        assert_eq!(storage.get_lesson_course_id_impl(999).await.unwrap(), None);

        let ids = storage
            .list_course_lesson_ids(&storage.db, course.id)
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_documents_are_scoped_to_lesson() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let course = seed_course(&storage, teacher.id, None).await;
        let lessons = seed_lessons(&storage, course.id, 2).await;

        let doc = storage
            .create_document_impl(
                lessons[0].id,
                CreateDocumentRequest {
                    name: "Slides".into(),
                    file_url: "https://cdn.example.com/slides.pdf".into(),
                    document_type: Some("pdf".into()),
                },
            )
            .await
            .unwrap();

        assert!(!storage.deactivate_document_impl(lessons[1].id, doc.id).await.unwrap());
        assert_eq!(storage.list_documents_impl(lessons[0].id).await.unwrap().len(), 1);
        assert!(storage.deactivate_document_impl(lessons[0].id, doc.id).await.unwrap());
        assert!(storage.list_documents_impl(lessons[0].id).await.unwrap().is_empty());
    }
}
