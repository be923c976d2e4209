use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ChapterService, DEFAULT_CHAPTER_PAGE_SIZE};
use crate::models::{ApiResponse, ErrorCode, chapters::requests::ChapterListParams};

pub async fn list_chapters(
    service: &ChapterService,
    query: ChapterListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.resolve(DEFAULT_CHAPTER_PAGE_SIZE);

    match storage
        .list_chapters_with_pagination(query.course_id, page, size)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Chapter list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve chapters: {e}"),
            )),
        ),
    }
}
