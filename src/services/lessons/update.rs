use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{LessonService, ensure_lesson_manager};
use crate::models::{ApiResponse, ErrorCode, lessons::requests::UpdateLessonRequest};

pub async fn update_lesson(
    service: &LessonService,
    lesson_id: i64,
    update_data: UpdateLessonRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if update_data
        .name
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
        || update_data.duration.is_some_and(|d| d < 0)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Lesson name cannot be empty and duration cannot be negative",
        )));
    }

    let storage = service.get_storage(request);

    if let Err(response) = ensure_lesson_manager(&storage, lesson_id, request).await {
        return Ok(response);
    }

    match storage.update_lesson(lesson_id, update_data).await {
        Ok(Some(lesson)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            lesson,
            "Lesson updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::LessonNotFound,
            "Lesson not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update lesson: {e}"),
            )),
        ),
    }
}
