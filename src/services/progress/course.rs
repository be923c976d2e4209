use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ProgressService, ensure_in_progress_enrollment};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, progress::responses::CourseProgressResponse};

pub async fn get_course_progress(
    service: &ProgressService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);

    match storage.get_course_by_id(course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve course: {e}"),
                )),
            );
        }
    }

    if let Err(response) = ensure_in_progress_enrollment(&storage, user_id, course_id).await {
        return Ok(response);
    }

    // 每次查询都全量重算
    let course_progress = match storage.recompute_course_progress(user_id, course_id).await {
        Ok(progress) => progress,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to compute course progress: {e}"),
                )),
            );
        }
    };

    match storage.list_course_lesson_progress(user_id, course_id).await {
        Ok(lesson_progresses) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CourseProgressResponse {
                course_progress,
                lesson_progresses,
            },
            "Course progress retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve lesson progress: {e}"),
            )),
        ),
    }
}
