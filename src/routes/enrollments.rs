use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::requests::{CreateEnrollmentRequest, EnrollmentListParams};
use crate::models::users::entities::UserRole;
use crate::services::EnrollmentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 EnrollmentService 实例
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_enrollments(query.into_inner(), &req)
        .await
}

pub async fn create_enrollment(
    req: HttpRequest,
    enrollment_data: web::Json<CreateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .create_enrollment(enrollment_data.into_inner(), &req)
        .await
}

pub async fn get_enrollment(req: HttpRequest, enrollment_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .get_enrollment(enrollment_id.0, &req)
        .await
}

pub async fn list_enrolled_courses(req: HttpRequest) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.list_enrolled_courses(&req).await
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_enrollments))
            .route(
                "/create",
                web::post()
                    .to(create_enrollment)
                    // 仅学生可以选课
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .route("/{id}", web::get().to(get_enrollment)),
    );

    cfg.service(
        web::scope("/api/v1/enrolled-courses")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_enrolled_courses)),
    );
}
