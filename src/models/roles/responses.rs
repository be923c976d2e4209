use super::entities::{Permission, Role};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/role.ts")]
pub struct RoleListResponse {
    pub items: Vec<Role>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../bindings/role.ts")]
pub struct PermissionListResponse {
    pub role: Role,
    pub items: Vec<Permission>,
}
