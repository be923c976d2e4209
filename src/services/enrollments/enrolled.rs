use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, enrollments::responses::EnrolledCourseListResponse};

pub async fn list_enrolled_courses(
    service: &EnrollmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);

    match storage.list_enrolled_courses(user_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EnrolledCourseListResponse { items },
            "Enrolled courses retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve enrolled courses: {e}"),
            )),
        ),
    }
}
