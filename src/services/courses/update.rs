use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, ensure_category_exists, ensure_course_manager, validate_price};
use crate::models::{ApiResponse, ErrorCode, courses::requests::UpdateCourseRequest};

pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    update_data: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(response) = ensure_course_manager(&storage, course_id, request).await {
        return Ok(response);
    }
    if let Err(response) = validate_price(update_data.price) {
        return Ok(response);
    }
    if let Some(category_id) = update_data.category_id
        && let Err(response) = ensure_category_exists(&storage, category_id).await
    {
        return Ok(response);
    }

    match storage.update_course(course_id, update_data).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            course,
            "Course updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update course: {e}"),
            )),
        ),
    }
}
