pub mod create;
pub mod delete;
pub mod list;
pub mod permissions;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::roles::requests::{
    CreatePermissionRequest, CreateRoleRequest, UpdateRoleRequest,
};
use crate::storage::Storage;

pub struct RoleService {
    storage: Option<Arc<dyn Storage>>,
}

impl RoleService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_roles(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_roles(self, request).await
    }

    pub async fn create_role(
        &self,
        role_data: CreateRoleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_role(self, role_data, request).await
    }

    pub async fn update_role(
        &self,
        role_id: i64,
        update_data: UpdateRoleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_role(self, role_id, update_data, request).await
    }

    pub async fn delete_role(&self, role_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        delete::delete_role(self, role_id, request).await
    }

    // 角色下的权限
    pub async fn list_permissions(
        &self,
        role_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        permissions::list_permissions(self, role_id, request).await
    }

    pub async fn create_permission(
        &self,
        role_id: i64,
        permission_data: CreatePermissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        permissions::create_permission(self, role_id, permission_data, request).await
    }

    pub async fn delete_permission(
        &self,
        role_id: i64,
        permission_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        permissions::delete_permission(self, role_id, permission_id, request).await
    }
}
