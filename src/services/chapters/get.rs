use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ChapterService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_chapter(
    service: &ChapterService,
    chapter_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_chapter_by_id(chapter_id).await {
        Ok(Some(chapter)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            chapter,
            "Chapter retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ChapterNotFound,
            "Chapter not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve chapter: {e}"),
            )),
        ),
    }
}
