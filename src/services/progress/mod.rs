pub mod course;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::enrollments::entities::EnrollmentStatus;
use crate::models::progress::requests::UpdateLessonProgressRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct ProgressService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProgressService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn update_lesson_progress(
        &self,
        progress_data: UpdateLessonProgressRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_lesson_progress(self, progress_data, request).await
    }

    pub async fn list_lesson_progress(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_lesson_progress(self, request).await
    }

    pub async fn get_course_progress(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        course::get_course_progress(self, course_id, request).await
    }
}

/// 学习进度只对学习中的选课开放
pub(crate) async fn ensure_in_progress_enrollment(
    storage: &Arc<dyn Storage>,
    user_id: i64,
    course_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_enrollment(user_id, course_id).await {
        Ok(Some(enrollment))
            if enrollment.active && enrollment.status == EnrollmentStatus::InProgress =>
        {
            Ok(())
        }
        Ok(_) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::NotEnrolled,
            "You are not enrolled in this course",
        ))),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve enrollment: {e}"),
            )),
        ),
    }
}
