use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ChapterService;
use crate::models::{ApiResponse, ErrorCode, chapters::requests::CreateChapterRequest};
use crate::services::courses::ensure_course_manager;

pub async fn create_chapter(
    service: &ChapterService,
    chapter_data: CreateChapterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if chapter_data.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Chapter name is required",
        )));
    }

    let storage = service.get_storage(request);

    if let Err(response) = ensure_course_manager(&storage, chapter_data.course_id, request).await
    {
        return Ok(response);
    }

    match storage.create_chapter(chapter_data).await {
        Ok(chapter) => Ok(HttpResponse::Created().json(ApiResponse::success(
            chapter,
            "Chapter created successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create chapter: {e}"),
            )),
        ),
    }
}
