use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RoleService;
use crate::models::{
    ApiResponse, ErrorCode,
    roles::{requests::CreatePermissionRequest, responses::PermissionListResponse},
};

const ALLOWED_METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

pub async fn list_permissions(
    service: &RoleService,
    role_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let role = match storage.get_role_by_id(role_id).await {
        Ok(Some(role)) => role,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::RoleNotFound,
                "Role not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to retrieve permissions: {e}"),
                )),
            );
        }
    };

    match storage.list_permissions(role_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PermissionListResponse { role, items },
            "Permission list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve permissions: {e}"),
            )),
        ),
    }
}

pub async fn create_permission(
    service: &RoleService,
    role_id: i64,
    permission_data: CreatePermissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let method = permission_data.method.trim().to_ascii_uppercase();
    if !ALLOWED_METHODS.contains(&method.as_str()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            format!("Unsupported method: {}", permission_data.method),
        )));
    }
    if !permission_data.path.starts_with('/') {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Permission path must start with '/'",
        )));
    }

    let storage = service.get_storage(request);

    match storage.get_role_by_id(role_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::RoleNotFound,
                "Role not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to create permission: {e}"),
                )),
            );
        }
    }

    match storage.create_permission(role_id, permission_data).await {
        Ok(permission) => Ok(HttpResponse::Created().json(ApiResponse::success(
            permission,
            "Permission created successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create permission: {e}"),
            )),
        ),
    }
}

pub async fn delete_permission(
    service: &RoleService,
    role_id: i64,
    permission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_permission(role_id, permission_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Permission deleted successfully",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PermissionNotFound,
            "Permission not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete permission: {e}"),
            )),
        ),
    }
}
