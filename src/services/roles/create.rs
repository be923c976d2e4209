use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RoleService;
use crate::models::{ApiResponse, ErrorCode, roles::requests::CreateRoleRequest};

pub async fn create_role(
    service: &RoleService,
    role_data: CreateRoleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if role_data.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Role name is required",
        )));
    }

    let storage = service.get_storage(request);

    match storage.get_role_by_name(&role_data.name).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::RoleAlreadyExists,
                "Role already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to create role: {e}"),
                )),
            );
        }
    }

    match storage.create_role(role_data).await {
        Ok(role) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(role, "Role created successfully")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create role: {e}"),
            )),
        ),
    }
}
