pub mod create;
pub mod delete;
pub mod documents;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::lessons::entities::Lesson;
use crate::models::lessons::requests::{
    CreateDocumentRequest, CreateLessonRequest, LessonListParams, UpdateLessonRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::ensure_course_manager;
use crate::storage::Storage;

/// 课时列表默认页大小
pub const DEFAULT_LESSON_PAGE_SIZE: u64 = 8;

pub struct LessonService {
    storage: Option<Arc<dyn Storage>>,
}

impl LessonService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_lessons(
        &self,
        query: LessonListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_lessons(self, query, request).await
    }

    pub async fn get_lesson(&self, lesson_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_lesson(self, lesson_id, request).await
    }

    pub async fn create_lesson(
        &self,
        lesson_data: CreateLessonRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_lesson(self, lesson_data, request).await
    }

    pub async fn update_lesson(
        &self,
        lesson_id: i64,
        update_data: UpdateLessonRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_lesson(self, lesson_id, update_data, request).await
    }

    pub async fn delete_lesson(
        &self,
        lesson_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_lesson(self, lesson_id, request).await
    }

    pub async fn list_documents(
        &self,
        lesson_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        documents::list_documents(self, lesson_id, request).await
    }

    pub async fn create_document(
        &self,
        lesson_id: i64,
        document_data: CreateDocumentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        documents::create_document(self, lesson_id, document_data, request).await
    }

    pub async fn delete_document(
        &self,
        lesson_id: i64,
        document_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        documents::delete_document(self, lesson_id, document_id, request).await
    }
}

/// 加载课时并校验当前用户可管理其所属课程
pub(crate) async fn ensure_lesson_manager(
    storage: &Arc<dyn Storage>,
    lesson_id: i64,
    request: &HttpRequest,
) -> Result<Lesson, HttpResponse> {
    let lesson = match storage.get_lesson_by_id(lesson_id).await {
        Ok(Some(lesson)) => lesson,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::LessonNotFound,
                "Lesson not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve lesson: {e}"),
                )),
            );
        }
    };

    let course_id = match storage.get_lesson_course_id(lesson.id).await {
        Ok(Some(course_id)) => course_id,
        // 章节已停用
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ChapterNotFound,
                "Chapter not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to resolve lesson course: {e}"),
                )),
            );
        }
    };

    ensure_course_manager(storage, course_id, request).await?;
    Ok(lesson)
}
