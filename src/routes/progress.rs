use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::progress::requests::UpdateLessonProgressRequest;
use crate::services::ProgressService;
use crate::utils::SafeCourseIdI64;

// 懒加载的全局 ProgressService 实例
static PROGRESS_SERVICE: Lazy<ProgressService> = Lazy::new(ProgressService::new_lazy);

pub async fn list_lesson_progress(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE.list_lesson_progress(&req).await
}

pub async fn update_progress(
    req: HttpRequest,
    progress_data: web::Json<UpdateLessonProgressRequest>,
) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE
        .update_lesson_progress(progress_data.into_inner(), &req)
        .await
}

pub async fn get_course_progress(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE.get_course_progress(course_id.0, &req).await
}

// 配置路由
pub fn configure_progress_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/lesson-progress")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_lesson_progress))
            .route("/update-progress", web::post().to(update_progress))
            .route("/course/{course_id}", web::get().to(get_course_progress)),
    );
}
