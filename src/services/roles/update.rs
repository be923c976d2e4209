use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RoleService;
use crate::middlewares::require_jwt::flush_cached_users;
use crate::models::{ApiResponse, ErrorCode, roles::requests::UpdateRoleRequest};

pub async fn update_role(
    service: &RoleService,
    role_id: i64,
    update_data: UpdateRoleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(ref name) = update_data.name
        && let Ok(Some(existing)) = storage.get_role_by_name(name).await
        && existing.id != role_id
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::RoleAlreadyExists,
            "Role already exists",
        )));
    }

    let renamed_or_toggled = update_data.name.is_some() || update_data.active.is_some();
    match storage.update_role(role_id, update_data).await {
        Ok(Some(role)) => {
            // 改名或停用会改变用户解析出的角色
            if renamed_or_toggled {
                flush_cached_users(request).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(role, "Role updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RoleNotFound,
            "Role not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update role: {e}"),
            )),
        ),
    }
}
