use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RoleService;
use crate::middlewares::require_jwt::flush_cached_users;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_role(
    service: &RoleService,
    role_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_role(role_id).await {
        Ok(true) => {
            tracing::warn!("Role {} deleted, users of this role are now unassigned", role_id);
            flush_cached_users(request).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Role deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RoleNotFound,
            "Role not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete role: {e}"),
            )),
        ),
    }
}
