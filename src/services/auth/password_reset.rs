//! 找回密码：邮箱验证码流程
//!
//! 验证码写入对象缓存 `otp:{email}`，带 TTL；重置成功后即失效。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::{CacheResult, ObjectCache};
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{
        requests::{ForgetPasswordRequest, ResetPasswordRequest, VerifyOtpRequest},
        responses::OtpVerificationResponse,
    },
    users::requests::UpdateUserRequest,
};
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_numeric_code;
use crate::utils::validate::{validate_email, validate_password};

use super::AuthService;

fn otp_key(email: &str) -> String {
    format!("otp:{}", email.trim().to_ascii_lowercase())
}

async fn otp_matches(cache: &Arc<dyn ObjectCache>, email: &str, otp: &str) -> bool {
    match cache.get_raw(&otp_key(email)).await {
        CacheResult::Found(stored) => !otp.is_empty() && stored == otp.trim(),
        _ => false,
    }
}

pub async fn handle_forget_password(
    service: &AuthService,
    forget_request: ForgetPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_email(&forget_request.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    let storage = service.get_storage(request);
    let config = service.get_config();

    // 无论邮箱是否存在都返回成功，避免枚举账号
    match storage.get_user_by_email(&forget_request.email).await {
        Ok(Some(user)) => {
            let code = generate_numeric_code(config.password_reset.otp_length);
            service
                .get_cache(request)
                .insert_raw(
                    otp_key(&forget_request.email),
                    code.clone(),
                    config.password_reset.otp_ttl,
                )
                .await;
            if config.is_development() {
                tracing::info!("Password reset OTP for user {}: {}", user.id, code);
            } else {
                tracing::info!("Password reset OTP issued for user {}", user.id);
            }
        }
        Ok(None) => {
            tracing::debug!("Password reset requested for unknown email");
        }
        Err(e) => {
            tracing::error!("Failed to look up user for password reset: {}", e);
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "If the email is registered, a verification code has been sent",
    )))
}

pub async fn handle_verify_otp(
    service: &AuthService,
    verify_request: VerifyOtpRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let cache = service.get_cache(request);

    if !otp_matches(&cache, &verify_request.email, &verify_request.otp).await {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::OtpInvalid,
            "Verification code is invalid or expired",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        OtpVerificationResponse {
            email: verify_request.email,
            valid: true,
        },
        "Verification code is valid",
    )))
}

pub async fn handle_reset_password(
    service: &AuthService,
    reset_request: ResetPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if reset_request.new_password != reset_request.confirm_password {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordMismatch,
            "Password and confirm password do not match",
        )));
    }
    if let Err(msg) = validate_password(&reset_request.new_password, &[reset_request.email.as_str()]) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    let cache = service.get_cache(request);
    if !otp_matches(&cache, &reset_request.email, &reset_request.otp).await {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::OtpInvalid,
            "Verification code is invalid or expired",
        )));
    }

    let storage = service.get_storage(request);
    let user = match storage.get_user_by_email(&reset_request.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to reset password: {e}"),
                )),
            );
        }
    };

    let password_hash = match hash_password(&reset_request.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("密码哈希失败: {e}"),
                )),
            );
        }
    };

    let update = UpdateUserRequest {
        password: Some(password_hash),
        ..Default::default()
    };
    match storage.update_user(user.id, update).await {
        Ok(Some(_)) => {
            cache.remove(&otp_key(&reset_request.email)).await;
            tracing::info!("Password reset for user {}", user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Password has been reset")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("Failed to reset password: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;

    #[test]
    fn test_otp_key_is_normalized() {
        assert_eq!(otp_key(" Alice@Example.com "), "otp:alice@example.com");
    }

    #[tokio::test]
    async fn test_otp_matches_cached_code() {
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(100, 60));
        cache
            .insert_raw(otp_key("a@example.com"), "123456".to_string(), 60)
            .await;

        assert!(otp_matches(&cache, "a@example.com", "123456").await);
        assert!(!otp_matches(&cache, "a@example.com", "654321").await);
        assert!(!otp_matches(&cache, "b@example.com", "123456").await);
    }
}
