use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ChapterService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::ensure_course_manager;

pub async fn delete_chapter(
    service: &ChapterService,
    chapter_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let chapter = match storage.get_chapter_by_id(chapter_id).await {
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

    match storage.deactivate_chapter(chapter_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Chapter deactivated successfully",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ChapterNotFound,
            "Chapter not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to deactivate chapter: {e}"),
            )),
        ),
    }
}
