use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::middlewares::{RequireJWT, require_jwt::flush_cached_users};
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 禁止删除当前登录用户
    if RequireJWT::extract_user_id(request) == Some(user_id) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        )));
    }

    let deleted = match service.get_storage(request).delete_user(user_id).await {
        Ok(deleted) => deleted,
        Err(e) => {
            tracing::error!("Failed to delete user {}: {}", user_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::UserDeleteFailed,
                    format!("User deletion failed: {e}"),
                )),
            );
        }
    };

    if !deleted {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        )));
    }

    // 已登录的会话不能继续使用缓存中的用户
    flush_cached_users(request).await;
    tracing::info!("User {} deleted", user_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
}
