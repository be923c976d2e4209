use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::errors::CourseHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::CreateEnrollmentRequest,
        responses::CreateEnrollmentResponse,
    },
};
use crate::services::payments::get_bridge;
use crate::storage::Storage;
use crate::utils::access::is_student;

pub async fn create_enrollment(
    service: &EnrollmentService,
    enrollment_data: CreateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };
    if !is_student(user.role.as_ref()) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::OnlyStudentCanEnroll,
            "Only students can enroll in courses",
        )));
    }

    let storage = service.get_storage(request);

    let course = match storage.get_course_by_id(enrollment_data.course_id).await {
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

    let enrollment = match prepare_enrollment(&storage, user.id, course.id).await {
        Ok(enrollment) => enrollment,
        Err(response) => return Ok(response),
    };

    if course.is_free() {
        return Ok(activate_free_enrollment(&storage, enrollment).await);
    }

    let bridge = get_bridge(request);
    match bridge.initiate(&enrollment, course.payable_amount()).await {
        Ok(initiation) => Ok(HttpResponse::Created().json(ApiResponse::success(
            CreateEnrollmentResponse {
                enrollment,
                pay_url: Some(initiation.pay_url),
                order_id: Some(initiation.order_id),
            },
            "Enrollment created, waiting for payment",
        ))),
        Err(e @ CourseHubError::PaymentGateway(_)) => {
            tracing::error!("Payment gateway failure for enrollment {}: {}", enrollment.id, e);
            Ok(HttpResponse::BadGateway().json(ApiResponse::error_empty(
                ErrorCode::PaymentGatewayError,
                "Payment gateway is unavailable, please try again later",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to initiate payment: {e}"),
            )),
        ),
    }
}

/// 取得可用于本次支付的选课记录
///
/// 已开通返回 409，已停用返回 403；待支付或支付失败的记录原样复用，
/// 状态只由支付回调改变。
async fn prepare_enrollment(
    storage: &std::sync::Arc<dyn Storage>,
    user_id: i64,
    course_id: i64,
) -> Result<Enrollment, HttpResponse> {
    let existing = storage
        .get_enrollment(user_id, course_id)
        .await
        .map_err(internal_error)?;

    let Some(existing) = existing else {
        return storage
            .create_enrollment(user_id, course_id, EnrollmentStatus::Pending)
            .await
            .map_err(|e| match e {
                // 并发重复选课
                CourseHubError::Conflict(_) => already_active(),
                other => internal_error(other),
            });
    };

    if !existing.active || existing.status == EnrollmentStatus::Inactive {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentInactive,
            "This enrollment has been deactivated",
        )));
    }
    if !existing.status.can_retry_payment() {
        return Err(already_active());
    }

    Ok(existing)
}

async fn activate_free_enrollment(
    storage: &std::sync::Arc<dyn Storage>,
    enrollment: Enrollment,
) -> HttpResponse {
    let enrollment = match storage
        .update_enrollment_status(enrollment.id, EnrollmentStatus::InProgress)
        .await
    {
        Ok(Some(enrollment)) => enrollment,
        Ok(None) => {
            return HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EnrollmentNotFound,
                "Enrollment not found",
            ));
        }
        Err(e) => return internal_error(e),
    };

    if let Err(e) = storage
        .recompute_course_progress(enrollment.user_id, enrollment.course_id)
        .await
    {
        tracing::warn!(
            "Failed to initialise progress for enrollment {}: {}",
            enrollment.id,
            e
        );
    }

    tracing::info!(
        "User {} enrolled in free course {}",
        enrollment.user_id,
        enrollment.course_id
    );
    HttpResponse::Created().json(ApiResponse::success(
        CreateEnrollmentResponse {
            enrollment,
            pay_url: None,
            order_id: None,
        },
        "Enrollment created successfully",
    ))
}

fn already_active() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::EnrollmentAlreadyActive,
        "You are already enrolled in this course",
    ))
}

fn internal_error(e: CourseHubError) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("Failed to create enrollment: {e}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, seed_course, seed_user};
    use actix_web::http::StatusCode;
    use std::sync::Arc;

    async fn enrollment_in(status: EnrollmentStatus) -> (Arc<dyn Storage>, Enrollment) {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher01", UserRole::Teacher).await;
        let student = seed_user(&storage, "student01", UserRole::Student).await;
        let course = seed_course(&storage, teacher.id, Some(100_000)).await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let enrollment = storage
            .create_enrollment(student.id, course.id, status)
            .await
            .unwrap();
        (storage, enrollment)
    }

    #[tokio::test]
    async fn test_retry_keeps_failed_status() {
        for status in [EnrollmentStatus::PaymentFailed, EnrollmentStatus::Failed] {
            let (storage, enrollment) = enrollment_in(status).await;
            let reused = prepare_enrollment(&storage, enrollment.user_id, enrollment.course_id)
                .await
                .unwrap();
            assert_eq!(reused.id, enrollment.id);
            assert_eq!(reused.status, status);

            let stored = storage
                .get_enrollment_by_id(enrollment.id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(stored.status, status);
        }
    }

    #[tokio::test]
    async fn test_active_or_inactive_enrollment_is_rejected() {
        let (storage, enrollment) = enrollment_in(EnrollmentStatus::Complete).await;
        let response = prepare_enrollment(&storage, enrollment.user_id, enrollment.course_id)
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let (storage, enrollment) = enrollment_in(EnrollmentStatus::Inactive).await;
        let response = prepare_enrollment(&storage, enrollment.user_id, enrollment.course_id)
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
