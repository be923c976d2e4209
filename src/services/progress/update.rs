use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ProgressService, ensure_in_progress_enrollment};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    progress::{requests::UpdateLessonProgressRequest, responses::UpdateLessonProgressResponse},
};

pub(crate) fn validate_progress(
    progress_data: &UpdateLessonProgressRequest,
) -> Result<(), &'static str> {
    let percentage = progress_data.completion_percentage;
    if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
        return Err("Completion percentage must be between 0 and 100");
    }
    if progress_data.watch_time < 0 {
        return Err("Watch time cannot be negative");
    }
    Ok(())
}

pub async fn update_lesson_progress(
    service: &ProgressService,
    progress_data: UpdateLessonProgressRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    if let Err(msg) = validate_progress(&progress_data) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidProgress,
            msg,
        )));
    }

    let storage = service.get_storage(request);

    let course_id = match storage.get_lesson_course_id(progress_data.lesson_id).await {
        Ok(Some(course_id)) => course_id,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::LessonNotFound,
                "Lesson not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve lesson: {e}"),
                )),
            );
        }
    };

    if let Err(response) = ensure_in_progress_enrollment(&storage, user_id, course_id).await {
        return Ok(response);
    }

    match storage
        .upsert_lesson_progress(
            user_id,
            progress_data.lesson_id,
            course_id,
            progress_data.watch_time,
            progress_data.completion_percentage,
        )
        .await
    {
        Ok((lesson_progress, course_progress)) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(
                UpdateLessonProgressResponse {
                    lesson_progress,
                    course_progress,
                },
                "Lesson progress updated successfully",
            ),
        )),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update lesson progress: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(watch_time: i64, completion_percentage: f64) -> UpdateLessonProgressRequest {
        UpdateLessonProgressRequest {
            lesson_id: 1,
            watch_time,
            completion_percentage,
        }
    }

    #[test]
    fn test_validate_progress_bounds() {
        assert!(validate_progress(&progress(0, 0.0)).is_ok());
        assert!(validate_progress(&progress(120, 100.0)).is_ok());
        assert!(validate_progress(&progress(0, 100.5)).is_err());
        assert!(validate_progress(&progress(0, -1.0)).is_err());
        assert!(validate_progress(&progress(0, f64::NAN)).is_err());
        assert!(validate_progress(&progress(-5, 50.0)).is_err());
    }
}
