use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::responses::{CourseDetailResponse, LecturerSummary},
};

pub async fn get_course_detail(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
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
    };

    // 讲师账号缺失不影响课程展示
    let lecturer = match storage.get_user_by_id(course.lecturer_id).await {
        Ok(user) => user.map(LecturerSummary::from),
        Err(e) => {
            tracing::warn!("Failed to load lecturer {}: {}", course.lecturer_id, e);
            None
        }
    };

    match storage.get_course_outline(course.id).await {
        Ok(chapters) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CourseDetailResponse {
                course,
                lecturer,
                chapters,
            },
            "Course detail retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve course outline: {e}"),
            )),
        ),
    }
}
