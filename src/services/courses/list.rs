use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, DEFAULT_COURSE_PAGE_SIZE};
use crate::models::{
    ApiResponse, ErrorCode,
    courses::requests::{CourseListParams, CourseListQuery},
};

pub async fn list_courses(
    service: &CourseService,
    query: CourseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let (Some(min), Some(max)) = (query.min_price, query.max_price)
        && min > max
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "min_price cannot be greater than max_price",
        )));
    }

    let storage = service.get_storage(request);
    let (page, size) = query.pagination.resolve(DEFAULT_COURSE_PAGE_SIZE);

    let list_query = CourseListQuery {
        page,
        size,
        lecturer_id: query.lecturer,
        category_id: query.category,
        min_price: query.min_price,
        max_price: query.max_price,
        level: query.level,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    match storage.list_courses_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Course list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve courses: {e}"),
            )),
        ),
    }
}
