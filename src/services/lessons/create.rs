use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LessonService;
use crate::models::{ApiResponse, ErrorCode, lessons::requests::CreateLessonRequest};
use crate::services::courses::ensure_course_manager;

pub async fn create_lesson(
    service: &LessonService,
    lesson_data: CreateLessonRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if lesson_data.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Lesson name is required",
        )));
    }
    if lesson_data.duration.is_some_and(|d| d < 0) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Lesson duration cannot be negative",
        )));
    }

    let storage = service.get_storage(request);

    let chapter = match storage.get_chapter_by_id(lesson_data.chapter_id).await {
        Ok(Some(chapter)) => chapter,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ChapterNotFound,
                "Chapter not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve chapter: {e}"),
                )),
            );
        }
    };

    if let Err(response) = ensure_course_manager(&storage, chapter.course_id, request).await {
        return Ok(response);
    }

    match storage.create_lesson(lesson_data).await {
        Ok(lesson) => Ok(HttpResponse::Created().json(ApiResponse::success(
            lesson,
            "Lesson created successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create lesson: {e}"),
            )),
        ),
    }
}
