use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ForumService, unauthorized};
use crate::errors::CourseHubError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, forums::requests::CreateForumRequest};
use crate::utils::access::is_teacher;

pub async fn create_forum(
    service: &ForumService,
    forum_data: CreateForumRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    if !is_teacher(user.role.as_ref()) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only teachers can create forums",
        )));
    }
    if forum_data.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Forum name is required",
        )));
    }

    let storage = service.get_storage(request);

    // 只能为自己讲授的课程开设论坛
    match storage.get_course_by_id(forum_data.course_id).await {
        Ok(Some(course)) if course.lecturer_id == user.id => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CoursePermissionDenied,
                "You can only create forums for your own courses",
            )));
        }
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

    match storage.create_forum(user.id, forum_data).await {
        Ok(forum) => Ok(HttpResponse::Created().json(ApiResponse::success(
            forum,
            "Forum created successfully",
        ))),
        Err(CourseHubError::Conflict(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::ForumAlreadyExists, "This course already has a forum"),
        )),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create forum: {e}"),
            )),
        ),
    }
}
