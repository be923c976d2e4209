use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ChapterService;
use crate::models::{ApiResponse, ErrorCode, chapters::requests::UpdateChapterRequest};
use crate::services::courses::ensure_course_manager;

pub async fn update_chapter(
    service: &ChapterService,
    chapter_id: i64,
    update_data: UpdateChapterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if update_data
        .name
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Chapter name cannot be empty",
        )));
    }

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

    match storage.update_chapter(chapter_id, update_data).await {
        Ok(Some(chapter)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            chapter,
            "Chapter updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ChapterNotFound,
            "Chapter not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update chapter: {e}"),
            )),
        ),
    }
}
