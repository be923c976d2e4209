use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, ensure_category_exists, validate_price};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode, courses::requests::CreateCourseRequest, users::entities::UserRole,
};
use crate::utils::access::is_admin;

pub async fn create_course(
    service: &CourseService,
    course_data: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    if course_data.name.trim().is_empty() || course_data.subject.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Course name and subject are required",
        )));
    }
    if let Err(response) = validate_price(course_data.price) {
        return Ok(response);
    }

    let storage = service.get_storage(request);

    if let Err(response) = ensure_category_exists(&storage, course_data.category_id).await {
        return Ok(response);
    }

    // 讲师只能以自己为讲师创建；管理员可指定讲师
    let lecturer_id = match course_data.lecturer_id {
        Some(lecturer_id) if is_admin(user.role.as_ref()) && lecturer_id != user.id => {
            match storage.get_user_by_id(lecturer_id).await {
                Ok(Some(lecturer)) if lecturer.role == Some(UserRole::Teacher) => lecturer.id,
                Ok(_) => {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::ValidationFailed,
                        "Lecturer must be an existing teacher",
                    )));
                }
                Err(e) => {
                    return Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            format!("Failed to load lecturer: {e}"),
                        )),
                    );
                }
            }
        }
        _ => user.id,
    };

    match storage.create_course(lecturer_id, course_data).await {
        Ok(course) => {
            tracing::info!("Course {} created by user {}", course.id, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                course,
                "Course created successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create course: {e}"),
            )),
        ),
    }
}
