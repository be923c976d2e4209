use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProgressService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, progress::responses::LessonProgressListResponse};

pub async fn list_lesson_progress(
    service: &ProgressService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);

    match storage.list_lesson_progress(user_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            LessonProgressListResponse { items },
            "Lesson progress retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve lesson progress: {e}"),
            )),
        ),
    }
}
