use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, TOP_COURSE_LIMIT};
use crate::models::{ApiResponse, ErrorCode, courses::responses::TopCourseListResponse};

pub async fn list_top_courses(
    service: &CourseService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_top_courses(TOP_COURSE_LIMIT).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TopCourseListResponse { items },
            "Top courses retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve top courses: {e}"),
            )),
        ),
    }
}
