use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DEFAULT_LESSON_PAGE_SIZE, LessonService};
use crate::models::{ApiResponse, ErrorCode, lessons::requests::LessonListParams};

pub async fn list_lessons(
    service: &LessonService,
    query: LessonListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.resolve(DEFAULT_LESSON_PAGE_SIZE);

    match storage
        .list_lessons_with_pagination(query.chapter_id, page, size)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Lesson list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve lessons: {e}"),
            )),
        ),
    }
}
