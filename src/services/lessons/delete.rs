use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{LessonService, ensure_lesson_manager};
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_lesson(
    service: &LessonService,
    lesson_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(response) = ensure_lesson_manager(&storage, lesson_id, request).await {
        return Ok(response);
    }

    match storage.deactivate_lesson(lesson_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Lesson deactivated successfully",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::LessonNotFound,
            "Lesson not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to deactivate lesson: {e}"),
            )),
        ),
    }
}
