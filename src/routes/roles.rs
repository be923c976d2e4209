use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::roles::requests::{CreatePermissionRequest, CreateRoleRequest, UpdateRoleRequest};
use crate::models::users::entities::UserRole;
use crate::services::RoleService;
use crate::utils::{SafeIDI64, SafePermissionIdI64};

// 懒加载的全局 RoleService 实例
static ROLE_SERVICE: Lazy<RoleService> = Lazy::new(RoleService::new_lazy);

pub async fn list_roles(req: HttpRequest) -> ActixResult<HttpResponse> {
    ROLE_SERVICE.list_roles(&req).await
}

pub async fn create_role(
    req: HttpRequest,
    role_data: web::Json<CreateRoleRequest>,
) -> ActixResult<HttpResponse> {
    ROLE_SERVICE.create_role(role_data.into_inner(), &req).await
}

pub async fn update_role(
    req: HttpRequest,
    role_id: SafeIDI64,
    update_data: web::Json<UpdateRoleRequest>,
) -> ActixResult<HttpResponse> {
    ROLE_SERVICE
        .update_role(role_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_role(req: HttpRequest, role_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ROLE_SERVICE.delete_role(role_id.0, &req).await
}

pub async fn list_permissions(req: HttpRequest, role_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ROLE_SERVICE.list_permissions(role_id.0, &req).await
}

pub async fn create_permission(
    req: HttpRequest,
    role_id: SafeIDI64,
    permission_data: web::Json<CreatePermissionRequest>,
) -> ActixResult<HttpResponse> {
    ROLE_SERVICE
        .create_permission(role_id.0, permission_data.into_inner(), &req)
        .await
}

pub async fn delete_permission(
    req: HttpRequest,
    role_id: SafeIDI64,
    permission_id: SafePermissionIdI64,
) -> ActixResult<HttpResponse> {
    ROLE_SERVICE
        .delete_permission(role_id.0, permission_id.0, &req)
        .await
}

// 配置路由
pub fn configure_role_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/roles")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::get().to(list_roles))
                    .route("", web::post().to(create_role))
                    .route("/{id}", web::put().to(update_role))
                    .route("/{id}", web::delete().to(delete_role))
                    .route("/{id}/permissions", web::get().to(list_permissions))
                    .route("/{id}/permissions", web::post().to(create_permission))
                    .route(
                        "/{id}/permissions/{permission_id}",
                        web::delete().to(delete_permission),
                    ),
            ),
    );
}
