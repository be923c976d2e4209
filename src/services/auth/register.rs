use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::UserRole,
        requests::{CreateUserRequest, RegisterRequest},
        responses::UserResponse,
    },
};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_password, validate_phone, validate_username,
};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    role: UserRole,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 字段合法性
    if let Err(response) = validate_register_request(&register_request) {
        return Ok(response);
    }

    // 2. 用户名与邮箱唯一
    if let Err(response) = check_username_exists(&storage, &register_request.username).await {
        return Ok(response);
    }
    if let Err(response) = check_email_exists(&storage, &register_request.email).await {
        return Ok(response);
    }

    // 3. 哈希密码
    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("密码哈希失败: {e}"),
                )),
            );
        }
    };

    // 4. 创建用户
    let create_request = CreateUserRequest::from_register(register_request, password_hash, role);
    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("User {} registered as {:?}", user.username, user.role);
            Ok(HttpResponse::Created().json(ApiResponse::success(UserResponse { user }, "注册成功")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("注册失败: {e}"),
            )),
        ),
    }
}

fn validate_register_request(req: &RegisterRequest) -> Result<(), HttpResponse> {
    if let Err(msg) = validate_username(&req.username) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }
    if let Err(msg) = validate_email(&req.email) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    if let Some(phone) = req.phone.as_deref()
        && let Err(msg) = validate_phone(phone)
    {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPhoneInvalid, msg)));
    }
    if let Err(msg) = validate_password(&req.password, &[req.username.as_str(), req.email.as_str()]) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }
    if req.password != req.confirm_password {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordMismatch,
            "Password and confirm password do not match",
        )));
    }
    Ok(())
}

async fn check_username_exists(
    storage: &Arc<dyn Storage>,
    username: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}

pub(crate) async fn check_email_exists(
    storage: &Arc<dyn Storage>,
    email: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            username: "student01".to_string(),
            email: "student01@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            first_name: None,
            last_name: None,
            phone: Some("+84901234567".to_string()),
            address: None,
            introduce: None,
            avatar_url: None,
        }
    }

    #[test]
    fn test_password_confirmation_must_match() {
        assert!(validate_register_request(&request("SecurePass123", "SecurePass123")).is_ok());
        let response =
            validate_register_request(&request("SecurePass123", "SecurePass124")).unwrap_err();
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_rejects_bad_phone() {
        let mut req = request("SecurePass123", "SecurePass123");
        req.phone = Some("call-me".to_string());
        assert!(validate_register_request(&req).is_err());
    }
}
